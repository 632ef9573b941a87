//! `version` command implementation

use anyhow::Result;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_line() -> String {
    format!("bootstrap-olm {VERSION}")
}

pub fn run() -> Result<()> {
    println!("{}", version_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::version_line;

    #[test]
    fn version_line_names_the_tool() {
        assert_eq!(version_line(), concat!("bootstrap-olm ", env!("CARGO_PKG_VERSION")));
    }
}
