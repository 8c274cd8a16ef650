use std::collections::VecDeque;

use crate::vector::Vector;
use Direction::*;

pub const INITIAL_MAX_LENGTH: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn unit(self) -> Vector {
        match self {
            Up => Vector::new(0, -1),
            Down => Vector::new(0, 1),
            Left => Vector::new(-1, 0),
            Right => Vector::new(1, 0),
        }
    }
}

pub struct Snake {
    // Oldest first. The head only joins the trail on the next advance.
    body: VecDeque<Vector>,
    head: Vector,
    speed: Vector,
    max_length: usize,
}

impl Snake {
    pub fn new() -> Self {
        Snake {
            body: VecDeque::new(),
            head: Vector::new(0, 0),
            speed: Right.unit(),
            max_length: INITIAL_MAX_LENGTH,
        }
    }

    pub fn body(&self) -> &VecDeque<Vector> {
        &self.body
    }

    pub fn head(&self) -> Vector {
        self.head
    }

    pub fn speed(&self) -> Vector {
        self.speed
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn advance(&mut self) {
        let new_head = self.head + self.speed;
        self.body.push_back(self.head);
        self.head = new_head;

        while self.body.len() > self.max_length {
            self.body.pop_front();
        }
    }

    /// Changes the heading unless that would repeat it, reverse it, or put
    /// the head straight onto the newest trail segment. Returns whether the
    /// heading changed.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        let target = direction.unit();

        let bites_neck = self.body.back().map_or(false, |neck| self.head + target == *neck);

        if target == self.speed || target == -self.speed || bites_neck {
            return false;
        }

        self.speed = target;
        true
    }

    pub fn grow(&mut self) {
        self.max_length += 1;
    }

    pub fn in_bounds(&self, grid_size: i32) -> bool {
        let x_in_range = 0 <= self.head.x && self.head.x < grid_size;
        let y_in_range = 0 <= self.head.y && self.head.y < grid_size;
        x_in_range && y_in_range
    }

    pub fn bites_itself(&self) -> bool {
        self.body.contains(&self.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(body: &[(i32, i32)], head: (i32, i32), speed: Direction) -> Snake {
        Snake {
            body: body.iter().map(|&(x, y)| Vector::new(x, y)).collect(),
            head: Vector::new(head.0, head.1),
            speed: speed.unit(),
            max_length: INITIAL_MAX_LENGTH,
        }
    }

    #[test]
    fn advance_trails_the_previous_head() {
        let mut snake = Snake::new();
        snake.advance();
        assert_eq!(snake.head(), Vector::new(1, 0));
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![Vector::new(0, 0)]);
    }

    #[test]
    fn body_never_exceeds_max_length() {
        let mut snake = Snake::new();
        for step in 0..40 {
            if step == 12 {
                snake.grow();
            }
            if step == 20 {
                snake.set_heading(Down);
            }
            snake.advance();
            assert!(snake.body().len() <= snake.max_length());
        }
        assert_eq!(snake.body().len(), INITIAL_MAX_LENGTH + 1);
        // Oldest entries are the ones dropped
        assert_eq!(snake.body().back(), Some(&(snake.head() - snake.speed())));
    }

    #[test]
    fn rejects_reversal() {
        for (from, reverse) in [(Right, Left), (Left, Right), (Up, Down), (Down, Up)] {
            let mut snake = snake_at(&[], (10, 10), from);
            assert!(!snake.set_heading(reverse));
            assert_eq!(snake.speed(), from.unit());
        }
    }

    #[test]
    fn rejects_turn_into_neck() {
        let mut snake = snake_at(&[(5, 5)], (6, 5), Right);
        assert!(!snake.set_heading(Left));
        assert_eq!(snake.speed(), Vector::new(1, 0));
    }

    #[test]
    fn rejects_turn_into_neck_after_quick_double_turn() {
        // Heading up was accepted, but the head has not moved yet
        let mut snake = snake_at(&[(4, 5), (5, 5)], (6, 5), Right);
        assert!(snake.set_heading(Up));
        assert!(!snake.set_heading(Left));
        assert_eq!(snake.speed(), Up.unit());
    }

    #[test]
    fn same_heading_is_a_no_op() {
        let mut snake = Snake::new();
        assert!(!snake.set_heading(Right));
        assert_eq!(snake.speed(), Right.unit());
    }

    #[test]
    fn fresh_snake_accepts_any_non_reversing_turn() {
        let mut snake = Snake::new();
        assert!(snake.set_heading(Up));

        let mut snake = Snake::new();
        assert!(snake.set_heading(Down));

        let mut snake = Snake::new();
        assert!(!snake.set_heading(Left));
    }

    #[test]
    fn grow_raises_max_length() {
        let mut snake = Snake::new();
        snake.grow();
        snake.grow();
        assert_eq!(snake.max_length(), INITIAL_MAX_LENGTH + 2);
    }

    #[test]
    fn boundary_check() {
        assert!(snake_at(&[], (39, 39), Right).in_bounds(40));
        assert!(snake_at(&[], (0, 0), Right).in_bounds(40));
        assert!(!snake_at(&[], (40, 0), Right).in_bounds(40));
        assert!(!snake_at(&[], (-1, 5), Right).in_bounds(40));
        assert!(!snake_at(&[], (3, 40), Right).in_bounds(40));
    }

    #[test]
    fn detects_self_bite() {
        assert!(snake_at(&[(1, 1), (2, 1), (2, 2)], (1, 1), Up).bites_itself());
        assert!(!snake_at(&[(1, 1), (2, 1)], (3, 1), Right).bites_itself());
    }
}
