use std::io;

use crate::system::source::Table;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read {table}: {source}")]
    Unavailable {
        table: Table,
        #[source]
        source: io::Error,
    },

    #[error("{table} has no well-formed aggregate cpu line")]
    MissingHeader { table: Table },
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("renderer failed: {0}")]
    Render(#[source] io::Error),
}
