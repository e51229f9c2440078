use crate::math::matrix::Matrix;

/// Turns a time-ordered feature matrix into supervised pairs:
/// `X[i] = F[i]`, `Y[i] = F[i+1]`. Fewer than two rows yield empty tensors:
/// a valid "no training data" result, not an error.
pub fn create_dataset(data: &Matrix) -> (Matrix, Matrix) {
    if data.rows < 2 {
        let empty = data.slice_rows(0, 0);
        return (empty.clone(), empty);
    }
    let x = data.slice_rows(0, data.rows - 1);
    let y = data.slice_rows(1, data.rows);
    (x, y)
}

/// The four tensors of a chronological train/test split. Targets are the
/// first feature column of the lookahead rows, reshaped to column vectors.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Matrix,
    pub x_test: Matrix,
    pub y_train: Matrix,
    pub y_test: Matrix,
}

/// Windows a feature matrix and splits it chronologically.
///
/// `time_step` is carried for interface compatibility with callers that
/// configure a lookback width, but the produced windows are always
/// single-step lookahead pairs regardless of its value.
#[derive(Debug, Clone)]
pub struct Windower {
    pub time_step: usize,
    pub train_ratio: f64,
}

impl Windower {
    pub fn new(time_step: usize, train_ratio: f64) -> Windower {
        Windower { time_step, train_ratio }
    }

    /// Windows `data`, takes the chronological prefix of
    /// `floor(len · train_ratio)` pairs as the train partition and the
    /// suffix as the test partition.
    pub fn create_train_test_sets(&self, data: &Matrix) -> TrainTestSplit {
        let (x, y) = create_dataset(data);
        let train_size = (x.rows as f64 * self.train_ratio).floor() as usize;

        let x_train = x.slice_rows(0, train_size);
        let x_test = x.slice_rows(train_size, x.rows);
        let y_train = y.slice_rows(0, train_size).column(0);
        let y_test = y.slice_rows(train_size, y.rows).column(0);

        TrainTestSplit { x_train, x_test, y_train, y_test }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Matrix {
        Matrix::from_data((0..n).map(|i| vec![i as f64, 10.0 * i as f64]).collect())
    }

    #[test]
    fn create_dataset_pairs_each_row_with_its_successor() {
        let f = ramp(5);
        let (x, y) = create_dataset(&f);
        assert_eq!(x.rows, 4);
        assert_eq!(y.rows, 4);
        for i in 0..3 {
            assert_eq!(y.data[i], x.data[i + 1]);
        }
        assert_eq!(y.data[3], f.data[4]);
    }

    #[test]
    fn create_dataset_on_short_input_yields_empty_tensors() {
        for n in [0, 1] {
            let (x, y) = create_dataset(&ramp(n));
            assert!(x.is_empty());
            assert!(y.is_empty());
        }
    }

    #[test]
    fn split_is_chronological_prefix_and_suffix() {
        let split = Windower::new(10, 0.5).create_train_test_sets(&ramp(9));
        // 8 pairs, train_size = 4
        assert_eq!(split.x_train.rows, 4);
        assert_eq!(split.x_test.rows, 4);
        assert_eq!(split.x_train.data[0][0], 0.0);
        assert_eq!(split.x_test.data[0][0], 4.0);
    }

    #[test]
    fn targets_are_the_first_column_as_a_column_vector() {
        let split = Windower::new(10, 0.5).create_train_test_sets(&ramp(5));
        assert_eq!(split.y_train.cols, 1);
        // Y[0] is F[1], whose first column is 1.0.
        assert_eq!(split.y_train.data[0][0], 1.0);
    }

    #[test]
    fn ratio_one_leaves_the_test_partition_empty() {
        let split = Windower::new(10, 1.0).create_train_test_sets(&ramp(6));
        assert_eq!(split.x_train.rows, 5);
        assert!(split.x_test.is_empty());
        assert!(split.y_test.is_empty());
    }

    #[test]
    fn ratio_zero_leaves_the_train_partition_empty() {
        let split = Windower::new(10, 0.0).create_train_test_sets(&ramp(6));
        assert!(split.x_train.is_empty());
        assert_eq!(split.x_test.rows, 5);
    }

    #[test]
    fn time_step_does_not_change_the_window_width() {
        let a = Windower::new(1, 0.5).create_train_test_sets(&ramp(9));
        let b = Windower::new(25, 0.5).create_train_test_sets(&ramp(9));
        assert_eq!(a.x_train.data, b.x_train.data);
        assert_eq!(a.y_test.data, b.y_test.data);
    }
}
