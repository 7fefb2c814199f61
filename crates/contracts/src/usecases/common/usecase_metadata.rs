/// Идентификация UseCase: индекс, техническое и отображаемое имя
pub trait UseCaseMetadata {
    /// Например, "u501"
    const INDEX: &'static str;

    /// Например, "export_to_marketplaces"
    const NAME: &'static str;

    const DISPLAY_NAME: &'static str;

    /// "u501_export_to_marketplaces"
    fn full_name() -> String {
        format!("{}_{}", Self::INDEX, Self::NAME)
    }
}
