use std::sync::Arc;

use shiftplan::scheduler::{SchedulingModel, SolverConfig};
use shiftplan::types::{
    Course, Schedule, ScheduleTime, SchedulingProblem, Shift, ShiftType, Student, Timeslot,
    Weekday,
};

fn monday_morning() -> Timeslot {
    Timeslot::new(
        Weekday::Monday,
        ScheduleTime::new(9, 0).unwrap(),
        ScheduleTime::new(11, 0).unwrap(),
    )
    .unwrap()
}

fn shift(kind: ShiftType, number: i32, capacity: i32, timeslots: Vec<Timeslot>) -> Shift {
    Shift::new(kind, number, capacity, timeslots).unwrap()
}

fn pick(course: &Arc<Course>, kind: ShiftType, number: i32) -> (Arc<Course>, Shift) {
    let shift = course.shift(kind, number).unwrap().clone();
    (Arc::clone(course), shift)
}

fn decompose(model: &SchedulingModel) -> (String, Vec<String>) {
    let mut constraints = model.constraint_strings();
    constraints.sort();

    (model.objective_string(), constraints)
}

#[test]
fn empty_problem() {
    let problem = SchedulingProblem::new([], []).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "0");
    assert!(constraints.is_empty());

    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert!(solution.final_schedules().is_empty());
}

#[test]
fn single_student_no_shifts() {
    let student = Student::new("A100", 1, [], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "0");
    assert!(constraints.is_empty());

    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert_eq!(solution.final_schedules().len(), 1);
    assert!(solution.final_schedules()["A100"].is_empty());
}

#[test]
fn single_student_single_shift_is_preassigned() {
    let course = Arc::new(
        Course::new("J301N1", 1, [shift(ShiftType::TP, 1, 10, vec![])]).unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "0");
    assert!(constraints.is_empty());

    let solution = model.solve(&SolverConfig::default()).unwrap();
    let schedule = &solution.final_schedules()["A100"];
    assert_eq!(schedule.get("J301N1", ShiftType::TP).unwrap().number(), 1);
}

#[test]
fn single_student_multiple_shifts() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::TP, 1, 10, vec![]),
                shift(ShiftType::TP, 2, 10, vec![]),
            ],
        )
        .unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "J301N1_TP1_OVERCROWD + J301N1_TP2_OVERCROWD");
    assert_eq!(
        constraints,
        [
            "A100_J301N1_TP1 + A100_J301N1_TP2 = 1",
            "J301N1_TP1_OVERCROWD - A100_J301N1_TP1 >= -10",
            "J301N1_TP2_OVERCROWD - A100_J301N1_TP2 >= -10",
        ]
    );

    let solution = model.solve(&SolverConfig::default()).unwrap();
    let schedule = &solution.final_schedules()["A100"];
    assert_eq!(schedule.len(), 1);
    assert!(schedule.get("J301N1", ShiftType::TP).is_some());
}

#[test]
fn existing_schedule_fixes_every_decision_of_its_student() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::TP, 1, 10, vec![]),
                shift(ShiftType::TP, 2, 10, vec![]),
            ],
        )
        .unwrap(),
    );

    let schedule = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let student1 = Student::new("A100", 1, [Arc::clone(&course)], schedule).unwrap();
    let student2 = Student::new("A200", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();

    let problem =
        SchedulingProblem::new([Arc::clone(&course)], [student1, student2]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "J301N1_TP1_OVERCROWD + J301N1_TP2_OVERCROWD");
    assert_eq!(
        constraints,
        [
            "A200_J301N1_TP1 + A200_J301N1_TP2 = 1",
            "J301N1_TP1_OVERCROWD - A200_J301N1_TP1 >= -9",
            "J301N1_TP2_OVERCROWD - A200_J301N1_TP2 >= -10",
        ]
    );

    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert_eq!(
        solution.final_schedules()["A100"]
            .get("J301N1", ShiftType::TP)
            .unwrap()
            .number(),
        1
    );
}

#[test]
fn same_slot_alternatives_produce_no_overlap_terms() {
    // Two TP shifts at the same time: coverage already makes them mutually
    // exclusive, so no overlap variable may appear.
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::TP, 1, 10, vec![monday_morning()]),
                shift(ShiftType::TP, 2, 10, vec![monday_morning()]),
            ],
        )
        .unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "J301N1_TP1_OVERCROWD + J301N1_TP2_OVERCROWD");
    assert_eq!(
        constraints,
        [
            "A100_J301N1_TP1 + A100_J301N1_TP2 = 1",
            "J301N1_TP1_OVERCROWD - A100_J301N1_TP1 >= -10",
            "J301N1_TP2_OVERCROWD - A100_J301N1_TP2 >= -10",
        ]
    );
}

#[test]
fn inevitable_overlap_stays_out_of_the_objective() {
    // Both shifts are the only one of their type, hence pre-assigned; the
    // clash is constant and the objective must not carry it.
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::T, 1, 10, vec![monday_morning()]),
                shift(ShiftType::TP, 1, 10, vec![monday_morning()]),
            ],
        )
        .unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "0");
    assert!(constraints.is_empty());
}

#[test]
fn open_pair_overlap_gets_a_linearised_and() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::T, 1, 10, vec![monday_morning()]),
                shift(ShiftType::T, 2, 10, vec![]),
                shift(ShiftType::TP, 1, 10, vec![monday_morning()]),
                shift(ShiftType::TP, 2, 10, vec![]),
            ],
        )
        .unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(
        objective,
        "10000 A100_J301N1_T1_J301N1_TP1 \
         + 0.1 J301N1_T1_OVERCROWD + 0.1 J301N1_T2_OVERCROWD \
         + J301N1_TP1_OVERCROWD + J301N1_TP2_OVERCROWD"
    );
    assert_eq!(
        constraints,
        [
            "A100_J301N1_T1 + A100_J301N1_T2 = 1",
            "A100_J301N1_T1_J301N1_TP1 - A100_J301N1_T1 - A100_J301N1_TP1 >= -1",
            "A100_J301N1_TP1 + A100_J301N1_TP2 = 1",
            "J301N1_T1_OVERCROWD - A100_J301N1_T1 >= -10",
            "J301N1_T2_OVERCROWD - A100_J301N1_T2 >= -10",
            "J301N1_TP1_OVERCROWD - A100_J301N1_TP1 >= -10",
            "J301N1_TP2_OVERCROWD - A100_J301N1_TP2 >= -10",
        ]
    );

    // The solver must dodge the 10000 penalty.
    let solution = model.solve(&SolverConfig::default()).unwrap();
    let schedule = &solution.final_schedules()["A100"];
    let t = schedule.get("J301N1", ShiftType::T).unwrap();
    let tp = schedule.get("J301N1", ShiftType::TP).unwrap();
    assert!(!t.overlaps(tp));
}

#[test]
fn fixed_against_open_overlap_charges_the_open_variable() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::T, 1, 10, vec![]),
                shift(ShiftType::T, 2, 10, vec![monday_morning()]),
                shift(ShiftType::TP, 1, 10, vec![monday_morning()]),
            ],
        )
        .unwrap(),
    );
    let schedule = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let student = Student::new("A100", 1, [Arc::clone(&course)], schedule).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(
        objective,
        "10000 A100_J301N1_T2 + 0.1 J301N1_T1_OVERCROWD + 0.1 J301N1_T2_OVERCROWD"
    );
    assert_eq!(
        constraints,
        [
            "A100_J301N1_T1 + A100_J301N1_T2 = 1",
            "J301N1_T1_OVERCROWD - A100_J301N1_T1 >= -10",
            "J301N1_T2_OVERCROWD - A100_J301N1_T2 >= -10",
        ]
    );

    let solution = model.solve(&SolverConfig::default()).unwrap();
    let schedule = &solution.final_schedules()["A100"];
    assert_eq!(schedule.get("J301N1", ShiftType::T).unwrap().number(), 1);
    assert_eq!(schedule.get("J301N1", ShiftType::TP).unwrap().number(), 1);
}

#[test]
fn fully_fixed_overcrowding_emits_nothing() {
    let course = Arc::new(
        Course::new("J301N1", 1, [shift(ShiftType::TP, 1, 1, vec![])]).unwrap(),
    );

    let schedule1 = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let schedule2 = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let student1 = Student::new("A100", 1, [Arc::clone(&course)], schedule1).unwrap();
    let student2 = Student::new("A200", 1, [Arc::clone(&course)], schedule2).unwrap();

    let problem =
        SchedulingProblem::new([Arc::clone(&course)], [student1, student2]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "0");
    assert!(constraints.is_empty());

    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert_eq!(solution.final_schedules().len(), 2);
}

#[test]
fn negative_residual_capacity_pressures_open_students_away() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::TP, 1, 1, vec![]),
                shift(ShiftType::TP, 2, 1, vec![]),
            ],
        )
        .unwrap(),
    );

    let schedule1 = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let schedule2 = Schedule::new([pick(&course, ShiftType::TP, 1)]).unwrap();
    let student1 = Student::new("A100", 1, [Arc::clone(&course)], schedule1).unwrap();
    let student2 = Student::new("A200", 1, [Arc::clone(&course)], schedule2).unwrap();
    let student3 = Student::new("A300", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();

    let problem =
        SchedulingProblem::new([Arc::clone(&course)], [student1, student2, student3]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let (objective, constraints) = decompose(&model);
    assert_eq!(objective, "J301N1_TP1_OVERCROWD + J301N1_TP2_OVERCROWD");
    assert_eq!(
        constraints,
        [
            "A300_J301N1_TP1 + A300_J301N1_TP2 = 1",
            "J301N1_TP1_OVERCROWD - A300_J301N1_TP1 >= 1",
            "J301N1_TP2_OVERCROWD - A300_J301N1_TP2 >= -1",
        ]
    );

    // TP1 already overflows by one; the open student must land in TP2.
    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert_eq!(
        solution.final_schedules()["A300"]
            .get("J301N1", ShiftType::TP)
            .unwrap()
            .number(),
        2
    );
}

#[test]
fn same_year_clash_carries_the_heavy_weight() {
    let course1 = Arc::new(
        Course::new(
            "C1",
            3,
            [
                shift(ShiftType::T, 1, 100, vec![monday_morning()]),
                shift(ShiftType::T, 2, 100, vec![]),
            ],
        )
        .unwrap(),
    );
    let course2 = Arc::new(
        Course::new(
            "C2",
            3,
            [
                shift(ShiftType::T, 1, 100, vec![monday_morning()]),
                shift(ShiftType::T, 2, 100, vec![]),
            ],
        )
        .unwrap(),
    );

    let student = Student::new(
        "A100",
        3,
        [Arc::clone(&course1), Arc::clone(&course2)],
        Schedule::empty(),
    )
    .unwrap();

    let problem = SchedulingProblem::new(
        [Arc::clone(&course1), Arc::clone(&course2)],
        [student],
    )
    .unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    let objective = model.objective_string();
    assert!(
        objective.contains("10000 A100_C1_T1_C2_T1"),
        "objective was: {objective}"
    );

    let solution = model.solve(&SolverConfig::default()).unwrap();
    let schedule = &solution.final_schedules()["A100"];
    let first = schedule.get("C1", ShiftType::T).unwrap();
    let second = schedule.get("C2", ShiftType::T).unwrap();
    assert!(!first.overlaps(second));
}

#[test]
fn arbitrary_bytes_in_ids_are_tolerated() {
    let course = Arc::new(
        Course::new("X\0Y\0Z", 1, [shift(ShiftType::TP, 1, 10, vec![])]).unwrap(),
    );
    let student = Student::new("A B C", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();

    let model = SchedulingModel::new(problem).unwrap();
    let solution = model.solve(&SolverConfig::default()).unwrap();
    assert_eq!(
        solution.final_schedules()["A B C"]
            .get("X\0Y\0Z", ShiftType::TP)
            .unwrap()
            .number(),
        1
    );
}

#[test]
fn solving_twice_works_on_one_model() {
    let course = Arc::new(
        Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::TP, 1, 10, vec![]),
                shift(ShiftType::TP, 2, 10, vec![]),
            ],
        )
        .unwrap(),
    );
    let student = Student::new("A100", 1, [Arc::clone(&course)], Schedule::empty()).unwrap();
    let problem = SchedulingProblem::new([Arc::clone(&course)], [student]).unwrap();
    let model = SchedulingModel::new(problem).unwrap();

    for _ in 0..3 {
        let solution = model.solve(&SolverConfig::default()).unwrap();
        let schedule = &solution.final_schedules()["A100"];
        assert_eq!(schedule.len(), 1);
        assert!(schedule.get("J301N1", ShiftType::TP).is_some());
    }
}

#[test]
fn equal_problems_build_identical_models() {
    let build = || {
        let course1 = Arc::new(
            Course::new(
                "C1",
                2,
                [
                    shift(ShiftType::T, 1, 50, vec![monday_morning()]),
                    shift(ShiftType::TP, 1, 10, vec![]),
                    shift(ShiftType::TP, 2, 10, vec![monday_morning()]),
                ],
            )
            .unwrap(),
        );
        let course2 = Arc::new(
            Course::new("C2", 1, [shift(ShiftType::PL, 1, 15, vec![monday_morning()])])
                .unwrap(),
        );

        let student1 = Student::new(
            "A100",
            2,
            [Arc::clone(&course1), Arc::clone(&course2)],
            Schedule::empty(),
        )
        .unwrap();
        let student2 =
            Student::new("A200", 1, [Arc::clone(&course2)], Schedule::empty()).unwrap();

        let problem = SchedulingProblem::new([course1, course2], [student1, student2]).unwrap();
        SchedulingModel::new(problem).unwrap()
    };

    let first = build();
    let second = build();
    assert_eq!(first.objective_string(), second.objective_string());
    assert_eq!(first.constraint_strings(), second.constraint_strings());
}
