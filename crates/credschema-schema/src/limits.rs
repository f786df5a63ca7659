//! Non-merklized attribute cap.

use credschema_core::{find_credential_subject, Attribute, NON_MERKLIZED_ATTRIBUTE_LIMIT};

use crate::error::SchemaError;

/// Check that `credentialSubject` holds at most
/// [`NON_MERKLIZED_ATTRIBUTE_LIMIT`] user attributes.
///
/// Only direct children count; the system `id` is excluded. Callers run this
/// before generating a non-merklized schema.
pub fn validate_non_merklized_attributes(attributes: &[Attribute]) -> Result<(), SchemaError> {
    let root = find_credential_subject(attributes).ok_or(SchemaError::MissingCredentialSubject)?;
    let count = root.user_children().count();
    if count > NON_MERKLIZED_ATTRIBUTE_LIMIT {
        return Err(SchemaError::AttributeLimit {
            limit: NON_MERKLIZED_ATTRIBUTE_LIMIT,
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credschema_core::{DataType, CREDENTIAL_SUBJECT_ID};

    fn root_with(n: usize) -> Vec<Attribute> {
        let mut root = Attribute::credential_subject();
        for i in 0..n {
            let name = format!("attr{i}");
            root.push_child(Attribute::new(
                format!("{CREDENTIAL_SUBJECT_ID}-{name}"),
                name,
                DataType::Integer,
                CREDENTIAL_SUBJECT_ID,
            ))
            .unwrap();
        }
        vec![root]
    }

    #[test]
    fn four_attributes_pass() {
        assert!(validate_non_merklized_attributes(&root_with(4)).is_ok());
    }

    #[test]
    fn five_attributes_fail() {
        let err = validate_non_merklized_attributes(&root_with(5)).unwrap_err();
        assert!(matches!(err, SchemaError::AttributeLimit { limit: 4, count: 5 }));
        assert_eq!(
            err.to_string(),
            "Non-merklized credentials support a maximum of 4 attributes"
        );
    }

    #[test]
    fn nested_attributes_do_not_count() {
        let mut attrs = root_with(4);
        let mut nested = Attribute::new("n", "nested", DataType::Object, "x");
        for i in 0..6 {
            nested
                .push_child(Attribute::new(format!("n-{i}"), format!("c{i}"), DataType::String, "n"))
                .unwrap();
        }
        attrs[0].children.as_mut().unwrap()[1] = nested;
        assert!(validate_non_merklized_attributes(&attrs).is_ok());
    }

    #[test]
    fn missing_root_fails() {
        assert!(matches!(
            validate_non_merklized_attributes(&[]),
            Err(SchemaError::MissingCredentialSubject)
        ));
    }
}
