use logit::datasets::concentric_rings;
use logit::metrics::accuracy;
use logit::preprocessors::{map_feature, StandardScaler};
use logit::{
    ConvergenceCheck, LogisticRegression, Matrix, Result, Solver, ThetaInit, Vector, Verbosity,
};

fn main() -> Result<()> {
    let x = Matrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
    let y = Vector::from_vec(vec![0.0, 0.0, 1.0, 1.0]);

    let mut model = LogisticRegression::new()
        .with_learning_rate(0.1)
        .with_reg_lambda(0.0)
        .with_max_iters(1_000)
        .with_verbosity(Verbosity::Info);
    model.fit(&x, &y)?;
    println!("theta: {:?}", model.theta().map(|t| t.as_slice()));
    println!("predictions: {:?}", model.predict(&x)?);

    let (rings, labels) = concentric_rings(100, 0);
    let mut scaler = StandardScaler::new();
    let mapped = scaler.fit_transform(&map_feature(&rings, 0, 1, 2)?)?;

    let mut model = LogisticRegression::new()
        .with_learning_rate(0.5)
        .with_reg_lambda(1e-3)
        .with_max_iters(100)
        .with_init(ThetaInit::Zeros)
        .with_solver(Solver::AdaptiveInstanceDescent {
            convergence: ConvergenceCheck::PerEpoch,
        })
        .with_seed(0)
        .with_verbosity(Verbosity::Info);
    let report = model.fit(&mapped, &labels)?;
    println!(
        "rings: {} passes, converged: {}, accuracy: {:.3}",
        report.iterations,
        report.converged,
        accuracy(&labels, &model.predict(&mapped)?)?
    );

    Ok(())
}
