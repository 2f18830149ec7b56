#![no_main]
use hashpal_digest::{oneshot, DigestCtx, HashAlgId};
use libfuzzer_sys::fuzz_target;

// Byte 0 picks the algorithm, byte 1 the chunk size; the rest is the message.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let alg = HashAlgId::ALL[data[0] as usize % HashAlgId::ALL.len()];
    let chunk = data[1] as usize + 1;
    let msg = &data[2..];

    let mut ctx = DigestCtx::new(alg);
    let mut snap = [0u8; 64];
    for part in msg.chunks(chunk) {
        ctx.update(part).unwrap();
        ctx.current(&mut snap).unwrap();
    }
    let streamed = ctx.finish_vec().unwrap();
    assert_eq!(streamed, oneshot::digest(alg, msg).unwrap());
    assert_eq!(ctx.finish_vec().unwrap(), oneshot::digest(alg, b"").unwrap());
});
