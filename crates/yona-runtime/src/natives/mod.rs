//! Native modules installed into the module cache at interpreter startup
//! (spec §4.7.1): `Std\IO`, `Std\Math`, `Std\System`.

mod io;
mod math;
mod system;

use crate::modules::ModuleCache;

/// Installs every native module into `cache`, keyed the same way user
/// modules are keyed so that callers cannot distinguish the two (spec
/// §4.7.1 "indistinguishable from a user module").
pub fn install_all(cache: &mut ModuleCache) {
    for (key, module) in [io::module(), math::module(), system::module()] {
        cache.insert(key, module);
    }
}
