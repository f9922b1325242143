/// Camera settings handed to the mapping widget when it is created.

#[derive(Debug, Clone)]
pub struct MapTuning {
    pub zoom: u8,
    pub tilt: u8,
    pub map_type: &'static str,
    pub disable_default_ui: bool,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            zoom: 20,
            tilt: 60,
            map_type: "satellite",
            disable_default_ui: true,
        }
    }
}
