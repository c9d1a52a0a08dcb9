use crate::config::MutationConfig;

/// Search parameters that move from exploration to exploitation as the budget is consumed
#[derive(Debug, Clone)]
pub struct AdaptiveParameterControl {
    config: MutationConfig,
    consumed: f64,
}

impl AdaptiveParameterControl {
    pub fn new(config: MutationConfig) -> Self {
        Self {
            config,
            consumed: 0.0,
        }
    }

    /// Fraction of the search budget used so far, clamped to [0, 1]
    pub fn set_consumed_budget(&mut self, consumed: f64) {
        self.consumed = consumed.clamp(0.0, 1.0);
    }

    pub fn consumed_budget(&self) -> f64 {
        self.consumed
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// 0 at the start of the search, 1 once focused search is active
    fn progress(&self) -> f64 {
        let activation = self.config.focused_search_activation;
        if activation <= 0.0 || self.consumed >= activation {
            1.0
        } else {
            self.consumed / activation
        }
    }

    pub fn exploratory_value(&self, start: u32, end: u32) -> u32 {
        let value = start as f64 + (end as f64 - start as f64) * self.progress();
        value.round().max(0.0) as u32
    }

    pub fn exploratory_probability(&self, start: f64, end: f64) -> f64 {
        start + (end - start) * self.progress()
    }

    pub fn base_taint_analysis_probability(&self) -> f64 {
        self.exploratory_probability(
            self.config.taint_probability_start,
            self.config.taint_probability_end,
        )
    }

    pub fn delta_weights(&self) -> (u32, u32) {
        (self.config.delta_start, self.config.delta_end)
    }
}
