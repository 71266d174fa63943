use crate::compute::WORKGROUP_SIZE;
use crate::error::PassError;

/// Value the compute kernel writes at `index`.
pub fn kernel_value(index: usize) -> f32 {
    let local = index % WORKGROUP_SIZE as usize;
    index as f32 * 1000.0 + local as f32
}

pub fn expected_output(len: usize) -> Vec<f32> {
    (0..len).map(kernel_value).collect()
}

/// Checks a readback against the reference, reporting the first divergence.
pub fn verify(values: &[f32]) -> Result<(), PassError> {
    for (index, &actual) in values.iter().enumerate() {
        let expected = kernel_value(index);
        if actual != expected {
            return Err(PassError::KernelMismatch {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_values() {
        assert_eq!(kernel_value(0), 0.0);
        assert_eq!(kernel_value(1), 1001.0);
        assert_eq!(kernel_value(64), 64000.0);
        assert_eq!(kernel_value(249), 249_057.0);
    }

    #[test]
    fn test_verify_reports_first_mismatch() {
        let mut values = expected_output(250);
        assert!(verify(&values).is_ok());

        values[100] = -1.0;
        values[200] = -1.0;
        match verify(&values) {
            Err(PassError::KernelMismatch { index, actual, .. }) => {
                assert_eq!(index, 100);
                assert_eq!(actual, -1.0);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }
}
