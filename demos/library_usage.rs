use blockdiff::codec::base40;
use blockdiff::diff::{DiffEngine, DiffOptions, Overlays};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut left = b"PLAYER ONE  READY".to_vec();
    left.extend(base40::encode("CROCODILE      ")?);
    let mut right = b"PLAYER TWO  READY".to_vec();
    right.extend(base40::encode("ALLIGATOR      ")?);

    let opts = DiffOptions {
        line_length: 16,
        offset_width: 4,
        overlays: Overlays::ASCII | Overlays::BASE40,
    };
    let mut engine = DiffEngine::new(opts)?;
    let mut out = Vec::new();
    let stats = engine.run(&left[..], &right[..], &mut out)?;

    print!("{}", String::from_utf8(out)?);
    println!(
        "blocks: {}, differing: {}, differing bytes: {}",
        stats.blocks, stats.differing_blocks, stats.differing_bytes
    );
    Ok(())
}
