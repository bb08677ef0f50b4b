/// Output settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Skips the banner at startup.
    pub no_banner: bool,
    /// `0` prints everything, `1` keeps found lines and the final counts,
    /// `2` prints only the final counts.
    pub quiet: u8,
}
