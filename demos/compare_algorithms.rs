use palette_quant::{ComparisonHarness, ExtractionConfig, PixelBuffer};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    let target: usize = args
        .get(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(8);

    // Synthetic test image: four solid quadrants plus a gradient band
    let (width, height) = (128u32, 128u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let pixel = if y > 96 {
                [(x * 2) as u8, 64, (255 - x * 2 % 256) as u8, 255]
            } else {
                match (x < 64, y < 48) {
                    (true, true) => [220, 40, 40, 255],
                    (false, true) => [40, 200, 60, 255],
                    (true, false) => [40, 60, 220, 255],
                    (false, false) => [230, 220, 80, 255],
                }
            };
            data.extend_from_slice(&pixel);
        }
    }

    let frame = PixelBuffer::new(&data, width, height).expect("valid buffer");
    let config = ExtractionConfig {
        target_color_count: target,
        max_color_count: target * 2,
        quality_threshold: 0.3,
        color_distance_threshold: 20.0,
        memory_limit_mb: 128,
    };

    let report = match ComparisonHarness::new(42).run(&frame, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Comparison failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("| Algorithm | Colors | Quality | Speed | Memory | Overall |");
    println!("|-----------|--------|---------|-------|--------|---------|");
    for entry in &report.scores {
        match &entry.result {
            Some(result) => {
                println!(
                    "| {} | {} | {:.3} | {:.3} | {:.3} | {:.3} |",
                    entry.algorithm,
                    result.color_count,
                    entry.quality_score,
                    entry.speed_score,
                    entry.memory_score,
                    entry.overall_score
                );
            }
            None => {
                println!(
                    "| {} | ERROR: {} | | | | |",
                    entry.algorithm,
                    entry.error.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    match report.winner {
        Some(winner) => {
            println!();
            println!("Winner: {}", winner);
            if let Some(entry) = report.scores.iter().find(|s| s.algorithm == winner) {
                if let Some(result) = &entry.result {
                    println!("Palette:");
                    for color in &result.colors {
                        println!(
                            "  {}  freq={:.3} importance={:.3} repr={:.3}",
                            color.color.to_hex(),
                            color.frequency,
                            color.importance,
                            color.representativeness
                        );
                    }
                }
            }
        }
        None => println!("All algorithms failed"),
    }
}
