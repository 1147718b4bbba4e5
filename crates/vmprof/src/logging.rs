/// Installs `env_logger` when built with the `debug` feature. Called once by
/// the embedding host at startup; the library never installs a logger itself.
///
/// Safe to call more than once; only the first call has any effect.
pub fn init() {
    #[cfg(feature = "debug")]
    {
        let _ = env_logger::builder()
            .format_timestamp(None)
            .format_module_path(false)
            .try_init();
    }
}
