// Library surface for the game core, headless tests and the terminal front end.
// Nothing here touches the terminal except runtime::CrosstermEventSource.
pub mod clock;
pub mod color;
pub mod hint;
pub mod runtime;
pub mod session;
pub mod settings;

pub use color::{Channel, Color, ColorDelta};
pub use session::{Adjustment, Phase, RoundOutcome, SessionController, Snapshot};
pub use settings::{Difficulty, GameConfig, GameMode, Settings, SettingsField, SettingsPatch};
