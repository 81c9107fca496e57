use ndarray::Array1;

pub type NumericData = f64;
pub type Grid = Array1<NumericData>;
pub type Point = (NumericData, NumericData);
