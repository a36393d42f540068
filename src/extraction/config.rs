/// Tunable weights for name-candidate scoring. Each heuristic contributes
/// its weight independently and additively.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Minimum / maximum line length considered a possible name
    pub min_name_chars: usize,
    pub max_name_chars: usize,

    /// Named-entity detector classified the line as a person's name
    pub weight_entity: f64,
    /// Extra weight when the detector hit also matches `Givenname Surname`
    pub weight_entity_two_token: f64,
    /// Line matches one of the fixed name-shape patterns
    pub weight_shape: f64,
    /// Line contains a literal indicator substring ("name:", "student:", ...)
    pub weight_indicator: f64,
    /// Every whitespace token is proper-case
    pub weight_proper_case: f64,
    /// Token count is 2 or 3
    pub weight_token_count: f64,
    /// Line contains only letters, whitespace, periods, and hyphens
    pub weight_charset: f64,
    /// Neighbouring line mentions a name/id label
    pub weight_context: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_name_chars: 4,
            max_name_chars: 50,
            weight_entity: 0.6,
            weight_entity_two_token: 0.2,
            weight_shape: 0.4,
            weight_indicator: 0.4,
            weight_proper_case: 0.3,
            weight_token_count: 0.2,
            weight_charset: 0.2,
            weight_context: 0.3,
        }
    }
}
