use fpi_protocol::{payload, ProductReference};

use crate::{OutputFormat, PayloadForm};

pub(crate) fn run(
    output: OutputFormat,
    product_id: &str,
    state_hash: &str,
    form: PayloadForm,
    scan_base: Option<&str>,
) -> i32 {
    let reference = match ProductReference::new(product_id, state_hash) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            return 2;
        }
    };

    let encoded = match form {
        PayloadForm::Json => payload::encode_json(&reference),
        PayloadForm::Url => match scan_base {
            Some(base) => payload::encode_url(&reference, base),
            None => {
                eprintln!("error: --scan-base is required for --form url");
                return 2;
            }
        },
    };

    match output {
        OutputFormat::Text => println!("{}", encoded),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "form": match form {
                    PayloadForm::Json => "json",
                    PayloadForm::Url => "url",
                },
                "payload": encoded,
            })
        ),
    }
    0
}
