//! JSON form of the flat projection

use std::io::Write;

use super::{from_flat, to_flat, FlatMap};
use crate::error::Sie4iResult;
use crate::models::Sie4iModel;

/// Serialize a model as pretty-printed flat JSON
pub fn to_json(model: &Sie4iModel) -> Sie4iResult<String> {
    Ok(serde_json::to_string_pretty(&to_flat(model))?)
}

/// Serialize a model as flat JSON into `writer`
pub fn write_json<W: Write>(model: &Sie4iModel, writer: &mut W) -> Sie4iResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_flat(model))?;
    writer.flush()?;
    Ok(())
}

/// Build a model from flat JSON; the result is not validated
pub fn from_json(json: &str) -> Sie4iResult<Sie4iModel> {
    let flat: FlatMap = serde_json::from_str(json)?;
    from_flat(&flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Sie4iError;

    const INPUT: &str = r#"{
        "program_name": "Kassan",
        "program_version": "3",
        "company_name": "Bolaget AB",
        "account_number": ["1910", "3000"],
        "account_name": ["Kassa", "Försäljning"],
        "account_type": ["T", "I"],
        "entry_date": ["20210101"],
        "line_account": [["1910", "3000"]],
        "line_amount": [["250.00", "-250.00"]],
        "line_dimension_id": [[[], [1]]],
        "line_object_id": [[[], ["100"]]]
    }"#;

    #[test]
    fn test_from_json() {
        let model = from_json(INPUT).unwrap();
        assert_eq!(model.identification.program_name, "Kassan");
        assert_eq!(model.accounts.len(), 2);
        assert_eq!(model.journal_entries[0].lines.len(), 2);
        assert_eq!(model.journal_entries[0].lines[1].objects[0].object_id, "100");
    }

    #[test]
    fn test_json_round_trip() {
        let model = from_json(INPUT).unwrap();
        let json = to_json(&model).unwrap();
        assert_eq!(from_json(&json).unwrap(), model);

        let mut buffer = Vec::new();
        write_json(&model, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), json);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(from_json("{"), Err(Sie4iError::Json(_))));
        assert!(matches!(
            from_json(r#"{"account_number": 5}"#),
            Err(Sie4iError::Json(_))
        ));
    }
}
