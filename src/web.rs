use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::stats::{StatsError, StatsStore};

/// Stats persisted in the browser's `window.localStorage`.
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, StatsError> {
        let window = web_sys::window()
            .ok_or_else(|| StatsError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StatsError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StatsError::Unavailable("localStorage disabled".to_string()))
    }
}

impl StatsStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StatsError> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StatsError::Unavailable(format!("{err:?}")))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StatsError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StatsError::Unavailable(format!("{err:?}")))
    }
}

pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Routes `log` output to the browser console. Later calls are no-ops.
pub fn init_console_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
