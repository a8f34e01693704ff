pub struct DefaultsConfig {
    pub label: String,
    pub stride: usize,
    pub selection: String,
    pub reference_frame: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            label: "Trajectory".to_string(),
            stride: 1,
            selection: "backbone".to_string(),
            reference_frame: 0,
        }
    }
}
