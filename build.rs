use std::fs;

const SECTIONS: &[&str] = &["document", "links", "tables", "page", "html"];

fn main() {
    // Validate the bundled export config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for key in table.keys() {
        if !SECTIONS.contains(&key.as_str()) {
            panic!("Unknown section [{}] in default_config.toml", key);
        }
    }
}
