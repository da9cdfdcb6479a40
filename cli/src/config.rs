use clap::Parser;
use ensembl_core::{ParamValue, Params};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ensembl-rest")]
#[command(about = "Call EnsEMBL REST endpoints by name")]
pub struct Config {
    /// Base URL of the REST server
    #[arg(long, env = "ENSEMBL_REST_SERVER", conflicts_with = "genomes")]
    pub server: Option<String>,

    /// Use the EnsEMBL Genomes server
    #[arg(long)]
    pub genomes: bool,

    /// Proxy URL for all requests
    #[arg(long, env = "ENSEMBL_REST_PROXY")]
    pub proxy: Option<String>,

    /// JSON endpoint table replacing the built-in one
    #[arg(long, env = "ENSEMBL_REST_ENDPOINTS")]
    pub endpoints: Option<PathBuf>,

    /// Fail when the response body is not JSON
    #[arg(long)]
    pub strict: bool,

    /// Print the call record to stderr
    #[arg(long)]
    pub record: bool,

    /// List the available operations and exit
    #[arg(long)]
    pub list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Operation to call, e.g. lookup_id
    #[arg(required_unless_present = "list")]
    pub operation: Option<String>,

    /// Parameters as KEY=VALUE; a repeated KEY sends a list
    #[arg(value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl Config {
    /// Collect `KEY=VALUE` arguments into call parameters. Values stay text;
    /// repeated keys become lists in the order given.
    pub fn call_params(&self) -> Params {
        let mut params = Params::new();
        for (key, value) in &self.params {
            let merged = match params.get(key) {
                Some(ParamValue::List(items)) => {
                    let mut items = items.clone();
                    items.push(ParamValue::from(value));
                    ParamValue::List(items)
                }
                Some(previous) => ParamValue::List(vec![previous.clone(), ParamValue::from(value)]),
                None => ParamValue::from(value),
            };
            params.insert(key.as_str(), merged);
        }
        params
    }
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {arg:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("ensembl-rest").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_operation_and_params() {
        let config = parse(&["lookup_id", "id=ENSG00000157764", "expand=1"]);
        assert_eq!(config.operation.as_deref(), Some("lookup_id"));
        let params = config.call_params();
        assert_eq!(params.get("id"), Some(&ParamValue::from("ENSG00000157764")));
        assert_eq!(params.get("expand"), Some(&ParamValue::from("1")));
    }

    #[test]
    fn test_repeated_keys_become_lists() {
        let config = parse(&["overlap_id", "id=X", "feature=gene", "feature=exon", "feature=cds"]);
        let params = config.call_params();
        assert_eq!(
            params.get("feature"),
            Some(&ParamValue::from(vec!["gene", "exon", "cds"]))
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        let config = parse(&["vep_hgvs_get", "species=human", "hgvs_notation=9:g.22125504G=C"]);
        assert_eq!(
            config.call_params().get("hgvs_notation"),
            Some(&ParamValue::from("9:g.22125504G=C"))
        );
    }

    #[test]
    fn test_bad_param_is_rejected() {
        let args = ["ensembl-rest", "lookup_id", "no-equals-sign"];
        assert!(Config::try_parse_from(args).is_err());
        let args = ["ensembl-rest", "lookup_id", "=value"];
        assert!(Config::try_parse_from(args).is_err());
    }

    #[test]
    fn test_list_needs_no_operation() {
        let config = parse(&["--list"]);
        assert!(config.list);
        assert!(config.operation.is_none());
        assert!(Config::try_parse_from(["ensembl-rest"]).is_err());
    }

    #[test]
    fn test_server_conflicts_with_genomes() {
        let args = ["ensembl-rest", "--genomes", "--server", "http://x", "ping"];
        assert!(Config::try_parse_from(args).is_err());
    }
}
