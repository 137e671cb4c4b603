//! Delegated selection: prompt a text generator and validate its picks.

use hubfinder_core::delegation::{build_prompt, parse_reply, DelegatedPick, DelegationError};
use hubfinder_core::models::ZoneProfile;
use thiserror::Error;

use crate::error::SourceError;
use crate::sources::TextGenerator;

#[derive(Debug, Error)]
pub enum DelegateError {
    /// The service could not be reached or answered with an error.
    #[error("text generation failed: {0}")]
    Service(#[from] SourceError),
    /// The service answered but the reply failed validation.
    #[error("delegation parse failure: {0}")]
    Parse(#[from] DelegationError),
}

pub async fn delegate_selection(
    generator: &dyn TextGenerator,
    city: &str,
    profiles: &[ZoneProfile],
) -> Result<Vec<DelegatedPick>, DelegateError> {
    let prompt = build_prompt(city, profiles)?;
    let reply = generator.generate(&prompt).await?;
    tracing::debug!("Delegation reply: {}", reply);
    let picks = parse_reply(&reply, profiles).inspect_err(|err| {
        tracing::error!("Rejected delegation reply: {}", err);
    })?;
    Ok(picks)
}
