use anyhow::{anyhow, Context, Result};

use crate::config::ProviderKind;

/// Pick the API token for `provider`: the explicit value when given,
/// otherwise ask on the terminal. Tokens are never written anywhere.
pub fn resolve_token(explicit: Option<String>, provider: ProviderKind) -> Result<String> {
    if let Some(token) = explicit.and_then(non_blank) {
        return Ok(token);
    }

    let prompt = format!("{} API token: ", provider);
    let token = rpassword::prompt_password(prompt).context("Failed to read API token")?;

    non_blank(token).ok_or_else(|| anyhow!("No API token provided for {}", provider))
}

fn non_blank(token: String) -> Option<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_token_is_trimmed() {
        let token = resolve_token(Some("  abc123\n".to_string()), ProviderKind::Hetzner).unwrap();
        assert_eq!(token, "abc123");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("   ".to_string()), None);
        assert_eq!(non_blank("x".to_string()), Some("x".to_string()));
    }
}
