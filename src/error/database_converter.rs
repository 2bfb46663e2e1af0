use crate::error::{AppError, ConstraintParser, ForeignKeyViolation};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into `AppError` variants.
///
/// Constraint violations the client caused become 4xx variants; everything
/// else becomes `AppError::Database` tagged with the failed operation.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        // PostgreSQL reports the offending key in DETAIL, separate from the message.
        let message = match info.details() {
            Some(details) => format!("{}\nDETAIL: {}", info.message(), details),
            None => info.message().to_string(),
        };
        let constraint_name = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(&message, constraint_name).map(
                    |violation| match violation {
                        ForeignKeyViolation::StillReferenced {
                            table,
                            referenced_by,
                        } => AppError::Conflict {
                            message: match referenced_by {
                                Some(child) => {
                                    format!("{} row is still referenced by {}", table, child)
                                }
                                None => format!("{} row is still referenced", table),
                            },
                        },
                        ForeignKeyViolation::MissingReference { field, value, .. } => {
                            AppError::Validation {
                                field,
                                reason: format!("Invalid reference with value '{}'", value),
                            }
                        }
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(&message).map(|field| {
                    AppError::Validation {
                        field,
                        reason: "Field is required".to_string(),
                    }
                })
            }
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(&message, constraint_name).map(
                    |(field, value)| AppError::Conflict {
                        message: format!("{} '{}' already exists", field, value),
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => constraint_name
                .and_then(ConstraintParser::parse_constraint_name)
                .map(|(_, field)| AppError::Validation {
                    field,
                    reason: "Check constraint failed".to_string(),
                }),
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}
