/// Compositor and backend configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Clear color for roots without a transparent background. Alpha is forced to 255.
    pub root_clear_rgba: [u8; 4],
    /// Transparent border, in pixels, around every intermediate pass buffer.
    pub pass_margin: u32,
    pub occlusion_culling: bool,
    /// Largest hardware target dimension.
    pub max_texture_size: u32,
    pub hardware_available: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            root_clear_rgba: [0, 0, 0, 255],
            pass_margin: 1,
            occlusion_culling: true,
            max_texture_size: 8192,
            hardware_available: true,
        }
    }
}

impl RenderSettings {
    /// Defaults overlaid with `TESSERA_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `TESSERA_PASS_MARGIN`, `TESSERA_OCCLUSION_CULLING`, `TESSERA_MAX_TEXTURE_SIZE` and
    /// `TESSERA_DISABLE_HARDWARE` where set and parseable.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(margin) = env_parse::<u32>("TESSERA_PASS_MARGIN") {
            self.pass_margin = margin;
        }
        if let Some(flag) = env_flag("TESSERA_OCCLUSION_CULLING") {
            self.occlusion_culling = flag;
        }
        if let Some(size) = env_parse::<u32>("TESSERA_MAX_TEXTURE_SIZE").filter(|&n| n > 0) {
            self.max_texture_size = size;
        }
        if env_flag("TESSERA_DISABLE_HARDWARE") == Some(true) {
            self.hardware_available = false;
        }
        self
    }

    pub fn with_root_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.root_clear_rgba = rgba;
        self
    }

    pub fn with_pass_margin(mut self, margin: u32) -> Self {
        self.pass_margin = margin;
        self
    }

    pub fn with_occlusion_culling(mut self, enabled: bool) -> Self {
        self.occlusion_culling = enabled;
        self
    }

    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    pub fn with_hardware_available(mut self, available: bool) -> Self {
        self.hardware_available = available;
        self
    }

    /// Premultiplied opaque root clear.
    pub(crate) fn root_clear_premul(&self) -> [u8; 4] {
        let [r, g, b, _] = self.root_clear_rgba;
        [r, g, b, 255]
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    match std::env::var(key).ok()?.trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/settings.rs"]
mod tests;
