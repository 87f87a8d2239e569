/// Human-readable pointer telemetry, e.g. `x=0.42, y=0.17`.
pub fn pointer_status(pointer: [f32; 2]) -> String {
    format!("x={:.2}, y={:.2}", pointer[0], pointer[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimals() {
        assert_eq!(pointer_status([0.4213, 0.1666]), "x=0.42, y=0.17");
        assert_eq!(pointer_status([0.0, 1.0]), "x=0.00, y=1.00");
    }
}
