/*!
 * Extraction of translatable strings from source files.
 *
 * - `entry`: decoded declarations and their validation
 * - `scanner`: lenient `t({...})` scanner over raw bytes
 * - `resolver`: grouping by code, conflict reporting, canonical selection
 */

pub use self::entry::{Entry, StringOrSequence, Translation};
pub use self::resolver::{Conflict, Resolution, resolve};
pub use self::scanner::{DeclarationScanner, extract_from_content};

pub mod entry;
pub mod resolver;
pub mod scanner;
