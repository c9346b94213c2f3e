fn main() {
    #[cfg(feature = "cli")]
    lzss_trace::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("lzss-trace: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
