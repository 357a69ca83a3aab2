use approx::assert_abs_diff_eq;
use lloyd::traits::{Fit, Predict};
use lloyd::DatasetBase;
use lloyd_clustering::{KMeans, KMeansError, KMeansInit, KMeansParamsError};
use lloyd_datasets::generate;
use ndarray::{array, Array1};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

#[test]
fn fit_from_rows() -> Result<(), KMeansError> {
    let rows = vec![[1., 1.], [1., 2.], [9., 9.], [9., 10.]];
    let dataset = DatasetBase::from_rows(&rows)?;

    let model = KMeans::params(2)
        .init_method(KMeansInit::Precomputed(array![[1., 1.], [9., 9.]]))
        .n_iterations(1)
        .fit(&dataset)?;

    assert_abs_diff_eq!(model.centroids(), &array![[1., 1.5], [9., 9.5]]);
    assert_eq!(model.clusters(), &[vec![0, 1], vec![2, 3]]);
    assert_abs_diff_eq!(model.inertia(), 1.0);
    Ok(())
}

#[test]
fn ragged_rows_are_a_dimension_mismatch() {
    let rows: Vec<Vec<f64>> = vec![vec![1., 1.], vec![1., 2., 3.]];
    let err = DatasetBase::from_rows(&rows).map_err(KMeansError::from);
    assert_eq!(
        err,
        Err(KMeansError::DimensionMismatch {
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn empty_rows_are_rejected() {
    let rows: Vec<Vec<f64>> = Vec::new();
    let dataset = DatasetBase::from_rows(&rows).unwrap();
    let res = KMeans::params(1).fit(&dataset);
    assert!(matches!(res, Err(KMeansError::EmptyInput { .. })));
}

#[test]
fn more_clusters_than_points() {
    let dataset = DatasetBase::from(array![[0., 1.], [1., 0.]]);
    let res = KMeans::params(3).fit(&dataset);
    assert_eq!(
        res,
        Err(KMeansError::InvalidConfiguration(
            KMeansParamsError::TooManyClusters {
                n_clusters: 3,
                n_observations: 2
            }
        ))
    );
}

#[test]
fn recovers_well_separated_blobs() {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let expected = array![[0., 1.], [-10., 20.], [-1., 10.], [15., 15.]];
    let data = generate::blobs(100, &expected, &mut rng);
    let dataset = DatasetBase::from(data);

    let model = KMeans::params_with_rng(4, rng)
        .n_runs(5)
        .n_iterations(100)
        .fit(&dataset)
        .expect("KMeans fitted");

    // every blob centre is close to exactly one centroid
    for centre in expected.rows() {
        let close = model
            .centroids()
            .rows()
            .into_iter()
            .map(|c| (&c - &centre).mapv(|x| x * x).sum())
            .filter(|&dist| dist < 1.)
            .count();
        assert_eq!(close, 1);
    }

    // blob members end up together
    let labels: Array1<usize> = model.predict(&expected);
    let dataset = model.predict(dataset);
    for (blob, &label) in labels.iter().enumerate() {
        let members = dataset.targets().slice(ndarray::s![blob * 100..(blob + 1) * 100]);
        let agreeing = members.iter().filter(|&&m| m == label).count();
        assert!(agreeing >= 95, "blob {} kept only {} points", blob, agreeing);
    }
}
