use fpi_protocol::{payload, ProductReference, ScanOutcome};

use super::{failure_code, runtime, Context};
use crate::OutputFormat;

pub(crate) fn run(
    ctx: &Context,
    payload_arg: Option<&str>,
    product_id: Option<&str>,
    state_hash: Option<&str>,
) -> i32 {
    let reference = match resolve_reference(payload_arg, product_id, state_hash) {
        Ok(r) => r,
        Err(message) => {
            eprintln!("error: {}", message);
            return 2;
        }
    };

    let (_store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.submit_scan(&reference)) {
        Ok(outcome) => {
            print_outcome(ctx.output, &outcome);
            if outcome.verdict.is_authentic {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

fn resolve_reference(
    payload_arg: Option<&str>,
    product_id: Option<&str>,
    state_hash: Option<&str>,
) -> Result<ProductReference, String> {
    match (payload_arg, product_id, state_hash) {
        (Some(raw), None, None) => payload::decode(raw).map_err(|e| e.to_string()),
        (None, Some(pid), Some(hash)) => {
            ProductReference::new(pid, hash).map_err(|e| e.to_string())
        }
        _ => Err(
            "provide a QR payload, or both --product-id and --state-hash".to_string(),
        ),
    }
}

fn print_outcome(output: OutputFormat, outcome: &ScanOutcome) {
    match output {
        OutputFormat::Text => {
            let verdict = &outcome.verdict;
            if verdict.is_authentic {
                println!("AUTHENTIC (HASH MATCH)");
            } else {
                println!("NOT AUTHENTIC (MISMATCH)");
            }
            println!("  isLatestDbState:       {}", verdict.is_latest_db_state);
            println!("  dbCloudHashMatches:    {}", verdict.db_cloud_hash_matches);
            println!(
                "  chainCloudHashMatches: {}",
                verdict.chain_cloud_hash_matches
            );
            if !verdict.message.is_empty() {
                println!("  message: {}", verdict.message);
            }
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "verdict": outcome.verdict,
                "product": outcome.product,
                "chain": outcome.chain,
                "events": outcome.events,
            })
        ),
    }
}
