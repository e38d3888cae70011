fn main() {
    println!("cargo:rerun-if-changed=src/default_settings.toml");
    // Validate the embedded settings at compile time.
    let content = include_str!("src/default_settings.toml");
    let value: toml::Value = match content.parse() {
        Ok(v) => v,
        Err(e) => panic!("src/default_settings.toml contains invalid TOML: {e}"),
    };
    for section in ["resolver", "rules", "profile", "filter"] {
        if value.get(section).and_then(|v| v.as_table()).is_none() {
            panic!("src/default_settings.toml is missing the [{section}] table");
        }
    }
}
