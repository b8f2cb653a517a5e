use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod game;
pub mod hand;
pub mod stats;
pub mod web;

pub use config::TableConfig;
pub use deck::{Card, CardView, Deck, RandomShuffler, Shuffler, Suit};
pub use game::{determine_winner, Engine, GamePhase, Outcome, Seat, TableEvent, TableView};
pub use hand::{is_blackjack, is_bust, score};
pub use stats::{FileStore, MemoryStore, Stats, StatsError, StatsStore, StatsTracker};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload<'a> {
    #[serde(flatten)]
    event: &'a TableEvent,
    haptic_ms: Option<u32>,
}

impl<'a> From<&'a TableEvent> for EventPayload<'a> {
    fn from(event: &'a TableEvent) -> Self {
        EventPayload {
            event,
            haptic_ms: event.haptic_ms(),
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// Browser handle on a single table. The page drives pacing by calling
/// `step` on its own timers, or `settle` to play everything out at once.
#[wasm_bindgen]
pub struct BlackjackTable {
    engine: Engine,
    listener: Option<Function>,
    backlog: Vec<TableEvent>,
}

#[wasm_bindgen]
impl BlackjackTable {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<BlackjackTable, JsValue> {
        console_error_panic_hook::set_once();
        web::init_console_logger();
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?
        };

        Ok(BlackjackTable {
            engine: Engine::new(&config, Box::new(web::LocalStorageStore)),
            listener: None,
            backlog: Vec::new(),
        })
    }

    /// Registers `callback(event)` for every event the engine produces.
    #[wasm_bindgen(js_name = setEventListener)]
    pub fn set_event_listener(&mut self, callback: Option<Function>) {
        self.listener = callback;
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> bool {
        let accepted = self.engine.new_game();
        if accepted {
            self.backlog.clear();
        }
        self.dispatch();
        accepted
    }

    pub fn hit(&mut self) -> bool {
        let accepted = self.engine.hit();
        self.dispatch();
        accepted
    }

    pub fn stand(&mut self) -> bool {
        let accepted = self.engine.stand();
        self.dispatch();
        accepted
    }

    pub fn step(&mut self) -> bool {
        let progressed = self.engine.step();
        self.dispatch();
        progressed
    }

    pub fn settle(&mut self) {
        self.engine.settle();
        self.dispatch();
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.view())
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }

    /// Events not delivered to a listener since the last call. Undrained
    /// events from a finished round are dropped by `newGame`.
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> Result<JsValue, JsValue> {
        let payloads: Vec<EventPayload> = self.backlog.iter().map(EventPayload::from).collect();
        let value = to_js(&payloads)
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))?;
        self.backlog.clear();
        Ok(value)
    }

    fn dispatch(&mut self) {
        let events = self.engine.take_events();
        let Some(listener) = &self.listener else {
            self.backlog.extend(events);
            return;
        };
        for event in &events {
            match to_js(&EventPayload::from(event)) {
                Ok(payload) => {
                    if let Err(err) = listener.call1(&JsValue::NULL, &payload) {
                        log::warn!("event listener threw: {err:?}");
                    }
                }
                Err(err) => log::warn!("failed to serialize event: {err}"),
            }
        }
    }
}
