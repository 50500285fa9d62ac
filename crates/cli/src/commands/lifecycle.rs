//! Registration and transfer: the two operations that mint a QR payload.

use fpi_client::RegisterProductRequest;
use fpi_protocol::{payload, ProductReference};

use super::{failure_code, runtime, Context};
use crate::OutputFormat;

pub(crate) fn run_register(
    ctx: &Context,
    name: &str,
    batch: Option<String>,
    brand: Option<String>,
) -> i32 {
    let request = RegisterProductRequest {
        name: name.to_string(),
        batch,
        brand,
    };

    let (_store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.register_product(&request)) {
        Ok(reference) => {
            print_reference(ctx.output, &reference);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

pub(crate) fn run_transfer(ctx: &Context, code: &str, to: &str) -> i32 {
    let (_store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.transfer(code, to)) {
        Ok(reference) => {
            print_reference(ctx.output, &reference);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

/// The previous QR (if any) is stale from here on; print the payload for
/// the fresh one.
fn print_reference(output: OutputFormat, reference: &ProductReference) {
    let encoded = payload::encode_json(reference);
    match output {
        OutputFormat::Text => {
            println!("productId: {}", reference.product_id);
            println!("stateHash: {}", reference.state_hash);
            println!("payload:   {}", encoded);
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "productId": reference.product_id,
                "stateHash": reference.state_hash,
                "payload": encoded,
            })
        ),
    }
}
