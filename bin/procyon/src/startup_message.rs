pub const PROCYON_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn startup_message() -> String {
    format!(
        "
 ____  ____   ___   ______   ______  _   _
|  _ \\|  _ \\ / _ \\ / ___\\ \\ / / _ \\| \\ | |
| |_) | |_) | | | | |    \\ V / | | |  \\| |
|  __/|  _ <| |_| | |___  | || |_| | |\\  |
|_|   |_| \\_\\\\___/ \\____| |_| \\___/|_| \\_|

 Version          : {PROCYON_VERSION}
 Build Platform   : {}-{}
",
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}
