use clap::Args;

#[derive(Debug, Args)]
pub struct QueryArg {
    pub query: String,
}

#[derive(Debug, Args)]
pub struct PageArg {
    pub page_name: String,
}
