use fpi_client::{AuditDecision, Product};
use fpi_protocol::display;

use super::{failure_code, runtime, Context};
use crate::{DecisionArg, OutputFormat};

pub(crate) fn run_products(ctx: &Context) -> i32 {
    let (_store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.products()) {
        Ok(products) => {
            print_products(ctx.output, &products);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

pub(crate) fn run_audit(ctx: &Context, code: &str, decision: DecisionArg) -> i32 {
    let decision = match decision {
        DecisionArg::Accept => AuditDecision::Accept,
        DecisionArg::Reject => AuditDecision::Reject,
    };

    let (_store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.audit(code, decision)) {
        Ok(()) => {
            match decision {
                AuditDecision::Accept => println!("accepted as original"),
                AuditDecision::Reject => println!("marked as duplicate"),
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

fn print_products(output: OutputFormat, products: &[Product]) {
    match output {
        OutputFormat::Text => {
            if products.is_empty() {
                println!("no products found");
                return;
            }
            for p in products {
                println!(
                    "{}  {}  {}  {}  {}",
                    p.product_code,
                    p.name.as_deref().unwrap_or("-"),
                    p.batch.as_deref().unwrap_or("-"),
                    status_label(p.audit_status.as_deref()),
                    display::short(p.current_state_hash.as_deref().unwrap_or(""), 10),
                );
            }
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(products)
                .unwrap_or_else(|e| panic!("serialization error listing products: {}", e))
        ),
    }
}

fn status_label(status: Option<&str>) -> &'static str {
    match status.map(|s| s.trim().to_uppercase()) {
        Some(s) if s == "ACCEPT" => "ACCEPTED",
        Some(s) if s == "REJECT" => "REJECTED",
        _ => "PENDING",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(status_label(Some("ACCEPT")), "ACCEPTED");
        assert_eq!(status_label(Some("reject")), "REJECTED");
        assert_eq!(status_label(Some("whatever")), "PENDING");
        assert_eq!(status_label(None), "PENDING");
    }
}
