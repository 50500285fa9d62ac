use std::io::Read;

use fpi_protocol::payload;

use crate::OutputFormat;

pub(crate) fn run(output: OutputFormat, payload_arg: Option<&str>) -> i32 {
    let raw = match payload_arg {
        Some(p) => p.to_string(),
        None => {
            let mut buf = String::new();
            if std::io::stdin().read_to_string(&mut buf).is_err() {
                eprintln!("error: could not read payload from stdin");
                return 2;
            }
            buf
        }
    };

    match payload::decode(&raw) {
        Ok(reference) => {
            match output {
                OutputFormat::Text => {
                    println!("productId: {}", reference.product_id);
                    println!("stateHash: {}", reference.state_hash);
                }
                OutputFormat::Json => println!("{}", payload::encode_json(&reference)),
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}
