//! Contour assembly from a drawing-command stream.
//!
//! [`ContourBuilder`] is a two-state machine: `Idle` (no open contour) and
//! `Open` (accumulating points). `MoveTo` finalizes any open contour without
//! closing it, `Close` forces closure by repeating the first point, and the
//! end of the stream finalizes an open contour as-is.

use std::mem;

use log::trace;

use crate::bezier::{CubicSegment, Flattener, QuadSegment};
use crate::error::GraphicsError;
use crate::types::{Contour, DrawCommand, Point};

#[derive(Debug, Default)]
enum BuilderState {
    #[default]
    Idle,
    Open(Vec<Point>),
}

/// Incremental contour builder over a [`DrawCommand`] stream.
pub struct ContourBuilder<'a> {
    flattener: &'a dyn Flattener,
    state: BuilderState,
    contours: Vec<Contour>,
    /// Position of the next command, for diagnostics.
    index: usize,
}

impl<'a> ContourBuilder<'a> {
    #[must_use]
    pub fn new(flattener: &'a dyn Flattener) -> Self {
        Self {
            flattener,
            state: BuilderState::Idle,
            contours: Vec::new(),
            index: 0,
        }
    }

    /// Feed one command.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::MalformedPath`] if a `LineTo`, curve, or
    /// `Close` arrives while no contour is open.
    pub fn push(&mut self, cmd: DrawCommand) -> Result<(), GraphicsError> {
        let index = self.index;
        self.index += 1;
        let flattener = self.flattener;

        match cmd {
            DrawCommand::MoveTo(p) => {
                self.finalize();
                self.state = BuilderState::Open(vec![p]);
            }
            DrawCommand::LineTo(p) => self.open_points(cmd, index)?.push(p),
            DrawCommand::QuadTo(ctrl, end) => {
                let points = self.open_points(cmd, index)?;
                let start = last_point(points, cmd, index)?;
                flattener.flatten_quad(&QuadSegment::new(start, ctrl, end), points);
            }
            DrawCommand::CubicTo(ctrl1, ctrl2, end) => {
                let points = self.open_points(cmd, index)?;
                let start = last_point(points, cmd, index)?;
                flattener.flatten_cubic(&CubicSegment::new(start, ctrl1, ctrl2, end), points);
            }
            DrawCommand::Close => {
                let points = self.open_points(cmd, index)?;
                if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                    if first != last {
                        points.push(first);
                    }
                }
                self.finalize();
            }
        }
        Ok(())
    }

    /// Finalize any open contour and return everything built so far.
    #[must_use]
    pub fn finish(mut self) -> Vec<Contour> {
        self.finalize();
        self.contours
    }

    fn open_points(
        &mut self,
        cmd: DrawCommand,
        index: usize,
    ) -> Result<&mut Vec<Point>, GraphicsError> {
        match &mut self.state {
            BuilderState::Open(points) => Ok(points),
            BuilderState::Idle => Err(GraphicsError::MalformedPath {
                command: cmd.name(),
                index,
            }),
        }
    }

    fn finalize(&mut self) {
        if let BuilderState::Open(mut points) = mem::take(&mut self.state) {
            points.dedup();
            trace!("contour finalized with {} points", points.len());
            self.contours.push(Contour::new(points));
        }
    }
}

fn last_point(points: &[Point], cmd: DrawCommand, index: usize) -> Result<Point, GraphicsError> {
    points
        .last()
        .copied()
        .ok_or(GraphicsError::MalformedPath {
            command: cmd.name(),
            index,
        })
}

/// Build every contour of a command stream.
///
/// Consecutive coordinate-equal points are collapsed in each contour.
///
/// # Errors
///
/// Returns [`GraphicsError::MalformedPath`] on the first command that needs
/// an open contour when none is open.
pub fn build_contours(
    commands: &[DrawCommand],
    flattener: &dyn Flattener,
) -> Result<Vec<Contour>, GraphicsError> {
    let mut builder = ContourBuilder::new(flattener);
    for &cmd in commands {
        builder.push(cmd)?;
    }
    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests may panic")]
mod tests {
    use super::*;
    use crate::bezier::{AdaptiveFlattener, FixedSegments};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn build(commands: &[DrawCommand]) -> Result<Vec<Contour>, GraphicsError> {
        build_contours(commands, &FixedSegments::default())
    }

    #[test]
    fn empty_stream_yields_no_contours() {
        assert!(build(&[]).expect("build").is_empty());
    }

    #[test]
    fn close_appends_first_point() {
        let contours = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(10.0, 0.0)),
            DrawCommand::LineTo(p(10.0, 10.0)),
            DrawCommand::Close,
        ])
        .expect("build");
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].points,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)]
        );
        assert!(contours[0].is_closed());
    }

    #[test]
    fn close_on_already_closed_contour_adds_nothing() {
        let contours = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(5.0, 0.0)),
            DrawCommand::LineTo(p(0.0, 5.0)),
            DrawCommand::LineTo(p(0.0, 0.0)),
            DrawCommand::Close,
        ])
        .expect("build");
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn move_to_finalizes_without_closing() {
        let contours = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(1.0, 0.0)),
            DrawCommand::MoveTo(p(5.0, 5.0)),
            DrawCommand::LineTo(p(6.0, 5.0)),
        ])
        .expect("build");
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points, vec![p(0.0, 0.0), p(1.0, 0.0)]);
        assert!(!contours[0].is_closed());
        // End of stream keeps the trailing partial contour.
        assert_eq!(contours[1].points, vec![p(5.0, 5.0), p(6.0, 5.0)]);
    }

    #[test]
    fn line_without_move_is_malformed() {
        let err = build(&[DrawCommand::LineTo(p(1.0, 1.0))]).expect_err("should fail");
        assert_eq!(
            err,
            GraphicsError::MalformedPath {
                command: "LineTo",
                index: 0
            }
        );
    }

    #[test]
    fn close_after_close_is_malformed() {
        let err = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(1.0, 0.0)),
            DrawCommand::Close,
            DrawCommand::Close,
        ])
        .expect_err("should fail");
        assert_eq!(
            err,
            GraphicsError::MalformedPath {
                command: "Close",
                index: 3
            }
        );
    }

    #[test]
    fn curve_without_move_is_malformed() {
        let err = build(&[DrawCommand::QuadTo(p(1.0, 1.0), p(2.0, 0.0))]).expect_err("fail");
        assert!(matches!(
            err,
            GraphicsError::MalformedPath {
                command: "QuadTo",
                ..
            }
        ));
    }

    #[test]
    fn quad_uses_last_point_as_start() {
        let contours = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::QuadTo(p(4.0, 8.0), p(8.0, 0.0)),
        ])
        .expect("build");
        // One start point plus four flattened points.
        assert_eq!(contours[0].len(), 5);
        assert_eq!(contours[0].points[4], p(8.0, 0.0));
    }

    #[test]
    fn cubic_goes_through_flattener() {
        let flattener = AdaptiveFlattener::default();
        let contours = build_contours(
            &[
                DrawCommand::MoveTo(p(0.0, 0.0)),
                DrawCommand::CubicTo(p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0)),
            ],
            &flattener,
        )
        .expect("build");
        assert_eq!(contours[0].points, vec![p(0.0, 0.0), p(10.0, 0.0)]);
    }

    #[test]
    fn consecutive_duplicates_are_collapsed() {
        let contours = build(&[
            DrawCommand::MoveTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(0.0, 0.0)),
            DrawCommand::LineTo(p(3.0, 0.0)),
            DrawCommand::LineTo(p(3.0, 0.0)),
            DrawCommand::LineTo(p(3.0, 3.0)),
            DrawCommand::Close,
        ])
        .expect("build");
        assert_eq!(
            contours[0].points,
            vec![p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 0.0)]
        );
    }

    #[test]
    fn builder_reports_position_of_bad_command() {
        let flattener = FixedSegments::default();
        let mut builder = ContourBuilder::new(&flattener);
        builder.push(DrawCommand::MoveTo(p(0.0, 0.0))).expect("move");
        builder.push(DrawCommand::Close).expect("close");
        let err = builder
            .push(DrawCommand::LineTo(p(1.0, 1.0)))
            .expect_err("idle line");
        assert_eq!(
            err,
            GraphicsError::MalformedPath {
                command: "LineTo",
                index: 2
            }
        );
    }
}
