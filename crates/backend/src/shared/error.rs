/// Ошибка валидации входных данных; HTTP-слой отдаёт её как 400
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub fn validation(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(ValidationError(message.into()))
}

/// Является ли ошибка (или её причина) ошибкой валидации
pub fn is_validation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ValidationError>().is_some()
}
