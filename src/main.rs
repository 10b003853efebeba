// main.rs - CLI entry point

use cooccur::core::hardy_weinberg;
use cooccur::prelude::*;
use std::path::Path;
use std::time::Instant;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified; it also carries the p2 prior
    // table and significance label sets
    let mut config = Config::default();
    if let Some(config_path) = args.config.clone() {
        let (merged, loaded) = args.with_config_file(&config_path)?;
        args = merged;
        config = loaded;
    }

    println!("🚀 cooccur v{}", env!("CARGO_PKG_VERSION"));

    // Validate all arguments before any data is read
    let validation = validate_args(&args, &config)?;

    // Configure thread pool
    if let Some(n) = args.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Workers: {}", n);
    } else {
        println!("🧵 Workers: {} (auto-detected)", validation.workers);
    }

    println!(
        "🎯 Target: gene {} on chromosome {} ({}, release {}, {})",
        validation.gene,
        validation.chromosome,
        validation.build.name(),
        validation.release,
        if args.phased { "phased" } else { "unphased" }
    );

    // Validate required inputs
    let reference_path = args.reference.as_ref().ok_or("--reference is required")?;
    let genotypes_path = args.genotypes.as_ref().ok_or("--genotypes is required")?;
    let annotation_path = args.annotation.as_ref().ok_or("--annotation is required")?;
    let output_path = if args.dry_run {
        None
    } else {
        Some(args.output.as_ref().ok_or("--output is required")?)
    };

    let total_start = Instant::now();

    // Load the reference classification sets
    let reference = ReferenceSets::from_table(
        Path::new(reference_path),
        &validation.significance_column,
        &validation.coordinate_column,
        &validation.labels,
    )?;

    // Load the gene annotation for the requested release
    let annotation = AnnotationTable::from_file(Path::new(annotation_path), &validation.release)?;

    // Load the population frequency reference when provided
    let frequencies = match &args.frequencies {
        Some(path) => Some(FrequencyTable::from_file(
            Path::new(path),
            &validation.coordinate_column,
        )?),
        None => None,
    };

    if args.dry_run {
        // Inputs parse and the target is resolvable: stop before the scan
        let matrix = GenotypeMatrix::from_file(Path::new(genotypes_path))?;
        println!(
            "✅ Dry run completed: {} loci × {} individuals, {} reference variants",
            matrix.loci.len(),
            matrix.individuals.len(),
            reference.total()
        );
        return Ok(());
    }

    // Classify the cohort, reusing a compatible cached scan when available
    let cohort = load_or_classify(&args, &validation, genotypes_path, &reference, &annotation)?;

    // Aggregate phase-consistent co-occurrence
    let counts = aggregate(&cohort, &annotation, args.phased);
    if let Some(pair_log) = &args.pair_log {
        write_pair_log(pair_log, &counts)?;
    }

    // Score every VUS with observed co-occurrence
    let likelihood = score_cohort(
        &counts,
        &cohort,
        frequencies.as_ref(),
        validation.p2,
        validation.rarity_cutoff,
    );

    // Hardy-Weinberg equilibrium summary per variant class
    for class in [
        Classification::Benign,
        Classification::Pathogenic,
        Classification::Vus,
    ] {
        let records = hardy_weinberg::test_class(&cohort, class, frequencies.as_ref(), args.yates);
        let out_of_equilibrium = records.values().filter(|r| !r.in_equilibrium).count();
        println!(
            "📊 Hardy-Weinberg {:?}: {} variants tested, {} out of equilibrium",
            class,
            records.len(),
            out_of_equilibrium
        );
    }

    // Hardy-Weinberg statistics for homozygous VUS
    let homozygous = homozygous_vus(&cohort, frequencies.as_ref(), args.yates);

    if let Some(output) = output_path {
        write_report(
            output,
            &command_line,
            validation.build.name(),
            &validation.release,
            validation.chromosome,
            &validation.gene,
            args.phased,
            cohort.len(),
            &likelihood,
            &homozygous,
        )?;
    }

    println!(
        "🏁 Analysis completed in {:.2}s ({} VUS scored, {} homozygous-VUS records)",
        total_start.elapsed().as_secs_f64(),
        likelihood.len(),
        homozygous.len()
    );
    Ok(())
}

/// Reuse a compatible cohort cache or run the full partition scan, saving
/// the result when a cache path is configured
fn load_or_classify(
    args: &Args,
    validation: &ValidationResult,
    genotypes_path: &str,
    reference: &ReferenceSets,
    annotation: &AnnotationTable,
) -> Result<CohortMap, String> {
    if let Some(cache_path) = &args.cache_file {
        if Path::new(cache_path).exists() && !args.force_recompute {
            match CohortCache::load(cache_path) {
                Ok(cache)
                    if cache.is_compatible(
                        validation.build.name(),
                        &validation.release,
                        validation.chromosome,
                        &validation.gene,
                    ) =>
                {
                    println!(
                        "📂 Reusing cohort cache: {} individuals (created {})",
                        cache.metadata.cohort_size, cache.metadata.created
                    );
                    return Ok(cache.cohort);
                }
                Ok(_) => {
                    println!("⚠️  Cohort cache is for a different target; recomputing");
                }
                Err(e) => {
                    println!("⚠️  Cohort cache unreadable ({}); recomputing", e);
                }
            }
        }
    }

    let matrix = GenotypeMatrix::from_file(Path::new(genotypes_path))?;
    let cohort = classify_cohort(
        &matrix,
        reference,
        annotation,
        validation.chromosome,
        &validation.gene,
        validation.workers,
    )?;

    if let Some(cache_path) = &args.cache_file {
        let cache = CohortCache::new(
            cohort.clone(),
            validation.build.name(),
            &validation.release,
            validation.chromosome,
            &validation.gene,
            args.cache_note.clone(),
        );
        cache.save(cache_path)?;
    }

    Ok(cohort)
}
