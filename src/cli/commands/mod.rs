mod account;
mod entry;
mod ledger;
mod report;
mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in account::definitions()
        .into_iter()
        .chain(entry::definitions())
        .chain(ledger::definitions())
        .chain(report::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
