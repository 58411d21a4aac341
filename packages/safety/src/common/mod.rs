// Pure shared logic: normalization, detection, signatures. No I/O here.

pub mod moderation;
pub mod normalize;
pub mod pii;
pub mod utils;

pub use moderation::{moderate, ModerationDecision, ReasonCode};
pub use normalize::{fold_term, normalize, NormalizedView};
pub use pii::{detect_pii, detect_pii_with_options, PiiCategory, PiiFinding, PiiOptions};
pub use utils::*;
