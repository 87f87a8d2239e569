use crate::error::LumenError;
use crate::types::Resolution;

/// Resolutions of every cascade level, finest first.
///
/// Level `i` is `(W >> i, H >> i)`. Fails if `levels` is zero or the
/// coarsest level would have no texels.
pub fn cascade_resolutions(base: Resolution, levels: u32) -> Result<Vec<Resolution>, LumenError> {
    if levels == 0 {
        return Err(LumenError::InvalidConfig(
            "cascade needs at least one level".into(),
        ));
    }
    if levels > 31 {
        return Err(LumenError::InvalidConfig(format!(
            "{levels} cascade levels exceed the 31-bit shift range"
        )));
    }
    let coarsest = base.at_level(levels - 1);
    if coarsest.is_empty() {
        return Err(LumenError::InvalidConfig(format!(
            "{}x{} cannot hold {levels} cascade levels (level {} is {}x{})",
            base.width,
            base.height,
            levels - 1,
            coarsest.width,
            coarsest.height
        )));
    }
    Ok((0..levels).map(|i| base.at_level(i)).collect())
}

/// One step of the per-tick pass graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePass {
    /// Agent update (compute).
    Simulate,
    /// Zero the emission field.
    Clear,
    /// Splat agents into the emission field.
    Emit,
    /// Propagate the previous level (or emission) into cascade level `level`.
    Diffuse { level: u32 },
    /// Fold level `fine + 1` into level `fine`, writing `fine`'s scratch field.
    Merge { fine: u32 },
    /// Copy `level`'s scratch field back into its persistent field.
    CopyBack { level: u32 },
    /// Draw level 0 to the surface.
    Composite,
}

impl FramePass {
    pub fn label(&self) -> &'static str {
        match self {
            FramePass::Simulate => "agents-pass",
            FramePass::Clear => "clear-emission-pass",
            FramePass::Emit => "emit-pass",
            FramePass::Diffuse { .. } => "diffuse-pass",
            FramePass::Merge { .. } => "merge-pass",
            FramePass::CopyBack { .. } => "merge-copy-back",
            FramePass::Composite => "composite-pass",
        }
    }
}

/// Build the fixed pass order for a pyramid of `levels` levels.
///
/// Diffusion runs in increasing level order so each level reads the
/// current frame's output of the one before it. Merges run from the
/// coarsest pair down to (0, 1) so light folded into level `i + 1`
/// reaches level `i` in the same frame.
pub fn build_frame_schedule(levels: u32) -> Vec<FramePass> {
    let merges = levels.saturating_sub(1);
    let mut schedule = Vec::with_capacity(4 + levels as usize + 2 * merges as usize);
    schedule.push(FramePass::Simulate);
    schedule.push(FramePass::Clear);
    schedule.push(FramePass::Emit);
    for level in 0..levels {
        schedule.push(FramePass::Diffuse { level });
    }
    for fine in (0..merges).rev() {
        schedule.push(FramePass::Merge { fine });
        schedule.push(FramePass::CopyBack { level: fine });
    }
    schedule.push(FramePass::Composite);
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(schedule: &[FramePass], pass: FramePass) -> usize {
        schedule
            .iter()
            .position(|p| *p == pass)
            .unwrap_or_else(|| panic!("{pass:?} missing from schedule"))
    }

    #[test]
    fn test_three_level_pyramid() {
        let res = cascade_resolutions(Resolution::new(800, 600), 3).unwrap();
        assert_eq!(
            res,
            vec![
                Resolution::new(800, 600),
                Resolution::new(400, 300),
                Resolution::new(200, 150),
            ]
        );
    }

    #[test]
    fn test_odd_sizes_floor() {
        let res = cascade_resolutions(Resolution::new(101, 77), 3).unwrap();
        assert_eq!(res[1], Resolution::new(50, 38));
        assert_eq!(res[2], Resolution::new(25, 19));
    }

    #[test]
    fn test_pyramid_rejects_collapse() {
        assert!(cascade_resolutions(Resolution::new(3, 64), 3).is_err());
        assert!(cascade_resolutions(Resolution::new(64, 64), 0).is_err());
        assert!(cascade_resolutions(Resolution::new(4, 4), 3).is_ok());
    }

    #[test]
    fn test_schedule_three_levels() {
        let schedule = build_frame_schedule(3);
        assert_eq!(
            schedule,
            vec![
                FramePass::Simulate,
                FramePass::Clear,
                FramePass::Emit,
                FramePass::Diffuse { level: 0 },
                FramePass::Diffuse { level: 1 },
                FramePass::Diffuse { level: 2 },
                FramePass::Merge { fine: 1 },
                FramePass::CopyBack { level: 1 },
                FramePass::Merge { fine: 0 },
                FramePass::CopyBack { level: 0 },
                FramePass::Composite,
            ]
        );
    }

    #[test]
    fn test_clear_precedes_emit_precedes_diffuse() {
        let schedule = build_frame_schedule(5);
        let clear = position(&schedule, FramePass::Clear);
        let emit = position(&schedule, FramePass::Emit);
        let first = position(&schedule, FramePass::Diffuse { level: 0 });
        assert!(clear < emit && emit < first);
    }

    #[test]
    fn test_diffusion_strictly_increasing() {
        let schedule = build_frame_schedule(6);
        for level in 1..6 {
            assert!(
                position(&schedule, FramePass::Diffuse { level: level - 1 })
                    < position(&schedule, FramePass::Diffuse { level })
            );
        }
    }

    #[test]
    fn test_copy_back_follows_its_merge_and_precedes_composite() {
        let schedule = build_frame_schedule(4);
        let composite = position(&schedule, FramePass::Composite);
        let last_diffuse = position(&schedule, FramePass::Diffuse { level: 3 });
        for fine in 0..3 {
            let merge = position(&schedule, FramePass::Merge { fine });
            let copy = position(&schedule, FramePass::CopyBack { level: fine });
            assert!(last_diffuse < merge);
            assert_eq!(copy, merge + 1);
            assert!(copy < composite);
        }
        assert_eq!(composite, schedule.len() - 1);
    }

    #[test]
    fn test_single_level_has_no_merge() {
        let schedule = build_frame_schedule(1);
        assert!(!schedule
            .iter()
            .any(|p| matches!(p, FramePass::Merge { .. } | FramePass::CopyBack { .. })));
        assert_eq!(schedule.len(), 5);
    }
}
