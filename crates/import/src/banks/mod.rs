mod sberbank;
mod vestabank;
mod vtb;

pub use sberbank::Sberbank;
pub use vestabank::Vestabank;
pub use vtb::Vtb;
