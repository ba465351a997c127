use crate::cli::CountsLossWeightArgs;
use crate::coverage::{get_recommended_counts_loss_weight, read_peak_table, BigWigSource};
use crate::utils::{Error, Result};
use rayon::ThreadPoolBuilder;
use std::time;

pub fn counts_loss_weight(args: CountsLossWeightArgs) -> Result<()> {
    let start_timer = time::Instant::now();
    let sources: Vec<BigWigSource> = args.bigwig_paths.iter().map(BigWigSource::new).collect();
    if sources.len() != args.peaks_paths.len() {
        return Err(Error::MismatchedInput {
            tracks: sources.len(),
            peak_tables: args.peaks_paths.len(),
        });
    }

    let peak_tables = args
        .peaks_paths
        .iter()
        .map(|path| read_peak_table(path))
        .collect::<Result<Vec<_>>>()?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    let weight =
        pool.install(|| get_recommended_counts_loss_weight(&sources, &peak_tables, args.alpha))?;
    log::info!("Counts loss weight (alpha={}): {}", args.alpha, weight);
    println!("{}", weight);
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}
