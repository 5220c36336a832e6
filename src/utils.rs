use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Read a JSON document, reporting the path of the offending field on failure
/// (for example `objectives[1].kind`).
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| AppError::bad_request(format!("cannot read {}: {err}", path.display())))?;

    let deserializer = &mut serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let field = err.path().to_string();
        AppError::Decode(format!("{}: {field}: {}", path.display(), err.inner()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProposalForm;
    use std::io::Write;

    #[test]
    fn reports_field_path_on_type_mismatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "P", "objectives": [{{"name": 5}}]}}"#).unwrap();

        let err = read_json_file::<ProposalForm>(file.path()).unwrap_err();
        assert!(err.user_message().contains("objectives[0].name"), "{}", err.user_message());
    }

    #[test]
    fn missing_file_is_a_bad_request() {
        let err = read_json_file::<ProposalForm>(Path::new("/nonexistent/form.json")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
