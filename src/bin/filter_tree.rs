use csv::ReaderBuilder;
use filter_tree::data::dataset::Dataset;
use filter_tree::filters::{Filter, IdentityFilter, KernelHerding, RandomProjection, Standardize};
use filter_tree::kernels::RbfKernel;
use filter_tree::metrics::confusion::ClassificationMetrics;
use filter_tree::trees::classifier::FilterTreeClassifier;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SEED: u64 = 1;

/// Reads a CSV whose first `dimension` columns are features and whose next
/// column is a class name. Class names are numbered in order of appearance.
fn read_file_classification(
    file_path: &str,
    dimension: usize,
    header: bool,
) -> Result<(Dataset<f64, usize>, Vec<String>), Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(header)
        .from_path(file_path)?;
    let feature_names = if header {
        reader
            .headers()?
            .iter()
            .take(dimension)
            .map(str::to_string)
            .collect()
    } else {
        (0..dimension).map(|index| format!("x{}", index)).collect()
    };

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut label_map = HashMap::new();

    for result in reader.records() {
        let record = result?;
        for feature in record.iter().take(dimension) {
            features.push(feature.parse::<f64>()?);
        }

        let label = record.get(dimension).ok_or("Missing label")?;
        let next_id = label_map.len();
        labels.push(*label_map.entry(label.to_string()).or_insert(next_id));
    }
    if labels.is_empty() {
        return Err(format!("{} contains no rows", file_path).into());
    }

    let feature_matrix = DMatrix::from_row_slice(labels.len(), dimension, &features);
    Ok((
        Dataset::new(feature_matrix, DVector::from_vec(labels)),
        feature_names,
    ))
}

fn evaluate_tree<F: Filter>(
    name: &str,
    filter: F,
    num_classes: usize,
    train_dataset: &Dataset<f64, usize>,
    test_dataset: &Dataset<f64, usize>,
) -> Result<FilterTreeClassifier<F, usize>, Box<dyn Error>> {
    let mut classifier = FilterTreeClassifier::with_params(filter, None, Some(SEED))?;
    // The training split may miss classes that the test split contains.
    classifier.set_num_classes(Some(num_classes))?;
    classifier.fit(train_dataset)?;

    let predictions = classifier.predict(&test_dataset.x)?;
    let probabilities = classifier.predict_proba(&test_dataset.x)?;
    let accuracy = classifier.accuracy(&test_dataset.y, &predictions)?;
    let log_loss = classifier.log_loss(&test_dataset.y, &probabilities)?;
    let root = classifier.root().ok_or("Tree wasn't built")?;
    info!(
        filter = name,
        nodes = root.num_nodes(),
        depth = root.depth(),
        "Accuracy: {:.2}%, log loss: {:.4}",
        accuracy * 100.0,
        log_loss
    );
    Ok(classifier)
}

fn run(path: &str, dimension: usize, header: bool) -> Result<(), Box<dyn Error>> {
    let (dataset, feature_names) = read_file_classification(path, dimension, header)?;
    info!(rows = dataset.nrows(), features = dataset.ncols(), "Loaded dataset");

    let num_classes = dataset.y.iter().max().map_or(1, |&max| max + 1);
    let (train_dataset, test_dataset) = dataset.train_test_split(0.75, Some(SEED))?;

    let identity = evaluate_tree(
        "identity",
        IdentityFilter,
        num_classes,
        &train_dataset,
        &test_dataset,
    )?;
    evaluate_tree(
        "standardize",
        Standardize::new(),
        num_classes,
        &train_dataset,
        &test_dataset,
    )?;
    let components = (dimension / 2).max(1);
    evaluate_tree(
        "random-projection",
        RandomProjection::new(components)?,
        num_classes,
        &train_dataset,
        &test_dataset,
    )?;

    println!("{}", identity.render(Some(feature_names.as_slice()), 3)?);

    let herding = KernelHerding::new(RbfKernel::new(1.0 / dimension as f64)?, 10.0)?;
    let representatives = herding.sample(&train_dataset)?;
    info!(
        selected = representatives.nrows(),
        "Kernel herding picked representatives"
    );
    if representatives.is_not_empty() {
        evaluate_tree(
            "herded-sample",
            IdentityFilter,
            num_classes,
            &representatives,
            &test_dataset,
        )?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <path> <dimension> [--header]", args[0]);
        std::process::exit(2);
    }
    let dimension = match args[2].parse::<usize>() {
        Ok(dimension) if dimension > 0 => dimension,
        _ => {
            eprintln!("dimension must be a positive integer, got {}", args[2]);
            std::process::exit(2);
        }
    };
    let header = args.iter().skip(3).any(|arg| arg == "--header");

    if let Err(err) = run(&args[1], dimension, header) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
