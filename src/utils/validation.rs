use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

const CGPA_SCALE_MAX: Decimal = Decimal::TEN;

/// CGPA values are on a 0-10 scale.
pub fn validate_cgpa(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > CGPA_SCALE_MAX {
        return Err(ValidationError::new("cgpa_out_of_range"));
    }
    Ok(())
}

pub fn validate_no_blank_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new("blank_entry"));
    }
    Ok(())
}

/// Every entry must be a UUID. A typo fails the whole list instead of being dropped.
pub fn validate_uuid_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| Uuid::parse_str(v.trim()).is_err()) {
        return Err(ValidationError::new("invalid_id"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn cgpa_bounds() {
        assert!(validate_cgpa(&dec("8.5")).is_ok());
        assert!(validate_cgpa(&dec("0")).is_ok());
        assert!(validate_cgpa(&dec("10.01")).is_err());
        assert!(validate_cgpa(&dec("-1")).is_err());
    }

    #[test]
    fn blank_entries_rejected() {
        assert!(validate_no_blank_entries(&["Pune".to_string()]).is_ok());
        assert!(validate_no_blank_entries(&["Pune".to_string(), " ".to_string()]).is_err());
    }

    #[test]
    fn id_lists_reject_any_bad_entry() {
        let good = Uuid::new_v4().to_string();
        assert!(validate_uuid_entries(&[]).is_ok());
        assert!(validate_uuid_entries(&[good.clone()]).is_ok());
        assert!(validate_uuid_entries(&[good, "not-a-uuid".to_string()]).is_err());
    }
}
