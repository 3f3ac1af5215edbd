//! # Request Validation
//!
//! The engine prices whatever it is given. These checks are for the layer
//! in front of it (HTTP handler, CLI) to reject incomplete or nonsensical
//! requests before a quote is issued.
//!
//! | Check | Estimate | Quote |
//! |---|---|---|
//! | client name, email, phone present | yes | yes |
//! | area finite and positive | yes | yes |
//! | floors ≥ 1 | yes | yes |
//! | email contains `@` | no | yes |

use crate::errors::{QuoteError, QuoteResult};
use crate::request::ProjectRequest;

/// Validate a request before a quick estimate.
pub fn validate_estimate_request(request: &ProjectRequest) -> QuoteResult<()> {
    require_contact(request)?;
    check_project(request)
}

/// Validate a request before a detailed quote.
///
/// # Example
///
/// ```rust
/// use quote_core::request::{ClientInfo, ProjectRequest};
/// use quote_core::validation::validate_quote_request;
///
/// let request = ProjectRequest::default();
/// assert!(validate_quote_request(&request).is_err());
///
/// let request = request.with_client(ClientInfo::new("Ana", "ana@example.com", "+54 261 555 0000"));
/// assert!(validate_quote_request(&request).is_ok());
/// ```
pub fn validate_quote_request(request: &ProjectRequest) -> QuoteResult<()> {
    require_contact(request)?;

    if let Some(email) = request.client.email.as_deref() {
        if !email.contains('@') {
            return Err(QuoteError::invalid_input(
                "client.email",
                email,
                "Email address must contain '@'",
            ));
        }
    }

    check_project(request)
}

fn require_contact(request: &ProjectRequest) -> QuoteResult<()> {
    let fields = [
        ("client.name", &request.client.name),
        ("client.email", &request.client.email),
        ("client.phone", &request.client.phone),
    ];
    for (field, value) in fields {
        match value {
            Some(v) if !v.trim().is_empty() => {}
            _ => return Err(QuoteError::missing_field(field)),
        }
    }
    Ok(())
}

fn check_project(request: &ProjectRequest) -> QuoteResult<()> {
    if !request.area_m2.is_finite() || request.area_m2 <= 0.0 {
        return Err(QuoteError::invalid_input(
            "area_m2",
            request.area_m2.to_string(),
            "Area must be a positive number",
        ));
    }

    if request.floors < 1 {
        return Err(QuoteError::invalid_input(
            "floors",
            request.floors.to_string(),
            "A building has at least one floor",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ClientInfo;

    fn complete() -> ProjectRequest {
        ProjectRequest::default().with_client(ClientInfo::new("Franco", "franco@example.com", "+5492610000000"))
    }

    #[test]
    fn test_complete_request_passes() {
        assert!(validate_estimate_request(&complete()).is_ok());
        assert!(validate_quote_request(&complete()).is_ok());
    }

    #[test]
    fn test_missing_contact_fields() {
        let mut request = complete();
        request.client.phone = None;
        assert_eq!(
            validate_estimate_request(&request).unwrap_err(),
            QuoteError::missing_field("client.phone")
        );

        let mut request = complete();
        request.client.name = Some("   ".to_string());
        assert_eq!(
            validate_quote_request(&request).unwrap_err(),
            QuoteError::missing_field("client.name")
        );
    }

    #[test]
    fn test_area_and_floors() {
        for area in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = validate_estimate_request(&complete().with_area(area)).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
        assert!(validate_quote_request(&complete().with_floors(0)).is_err());
        assert!(validate_quote_request(&complete().with_floors(12)).is_ok());
    }

    #[test]
    fn test_email_checked_only_for_quotes() {
        let mut request = complete();
        request.client.email = Some("not-an-email".to_string());
        assert!(validate_estimate_request(&request).is_ok());
        assert!(validate_quote_request(&request).is_err());
    }

    #[test]
    fn test_unknown_enum_values_are_not_rejected() {
        let request = complete().with_location(crate::request::Location::from_key("atlantis"));
        assert!(validate_quote_request(&request).is_ok());
    }
}
