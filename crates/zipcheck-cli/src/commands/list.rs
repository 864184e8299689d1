//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::ListEntry;
use crate::output::Listing;
use crate::output::OutputFormatter;
use anyhow::Result;
use zipcheck_core::CatalogStats;
use zipcheck_core::ZipSource;
use zipcheck_core::catalog::walk;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let source = ZipSource::new(&args.archive);
    let catalog = add_archive_context(source.catalog(), &args.archive)?;

    let entries = walk(&catalog, "")
        .map(|(path, file)| ListEntry {
            path,
            size: file.size,
            crc32: file.crc32,
        })
        .collect();

    let listing = Listing {
        archive: &args.archive,
        entries,
        stats: CatalogStats::collect(&catalog),
    };

    formatter.format_listing(&listing, args.long, args.human_readable)
}
