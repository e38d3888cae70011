use std::fs;

use geo_core::settings;

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: resolver.max_geoword_len={}, rules.heads={}, profile.suffixes={}, filter.classes={}",
        s.resolver.max_geoword_len,
        s.rules.heads.len(),
        s.profile.suffixes.len(),
        s.filter.classes.len()
    );
}

/// Install a custom settings file as the process-wide settings.
pub fn init_settings(file: Option<&str>) {
    let Some(file) = file else {
        return;
    };
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(settings::init_custom(content), "Error in {file}: {}");
}
