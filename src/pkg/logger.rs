use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};

/// Console logger: `[time][level][target] message`, `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
