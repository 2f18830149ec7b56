//! Hash/digest command implementation.

use std::fs::File;
use std::io::{self, Read};

use hashpal_digest::{DigestCtx, HashAlgId};

pub fn run(
    algorithm: &str,
    file: &str,
    check: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let alg = parse_algorithm(algorithm)?;
    let ctx = if file == "-" {
        hash_reader(alg, io::stdin().lock())?
    } else {
        hash_reader(alg, File::open(file)?)?
    };

    let mut digest = [0u8; 64];
    let n = ctx.current(&mut digest)?;
    let encoded = hex::encode(&digest[..n]);
    if file == "-" {
        println!("{alg}(stdin)= {encoded}");
    } else {
        println!("{alg}({file})= {encoded}");
    }

    if let Some(expected) = check {
        let expected = hex::decode(expected.trim())
            .map_err(|e| format!("invalid --check value: {e}"))?;
        if !ctx.verify(&expected)? {
            return Err("digest mismatch".into());
        }
        println!("Verified OK");
    }
    Ok(())
}

fn parse_algorithm(algorithm: &str) -> Result<HashAlgId, Box<dyn std::error::Error>> {
    algorithm
        .parse()
        .map_err(|_| format!("unsupported hash algorithm: {algorithm}").into())
}

/// Stream `reader` through a fresh context for `alg`.
fn hash_reader(alg: HashAlgId, mut reader: impl Read) -> io::Result<DigestCtx> {
    let mut ctx = DigestCtx::new(alg);
    io::copy(&mut reader, &mut ctx)?;
    Ok(ctx)
}
