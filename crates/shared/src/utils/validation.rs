use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

fn describe(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match error.code.as_ref() {
            "email" => "Invalid email format".to_string(),
            "length" => "Invalid length".to_string(),
            "range" => "Value out of range".to_string(),
            "non_negative" => "Must not be negative".to_string(),
            "amount_too_large" => "Must be below 100000000".to_string(),
            _ => format!("Invalid {field}"),
        })
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(format!("{path}: {}", describe(field, error)));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

/// Flattens `validator` output into `field: message` lines, with nested
/// paths such as `items[2].quantity`.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect("", errors, &mut out);
    out.sort();

    if out.is_empty() {
        out.push("Validation failed".to_string());
    }
    out
}
