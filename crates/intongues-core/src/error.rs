use intongues_types::ParseVariantError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    #[error(transparent)]
    InvalidVariant(#[from] ParseVariantError),

    #[error("Expression is empty after normalisation: '{0}'")]
    EmptyExpression(String),
}
