//! Project and service forms.
//!
//! Forms only check that their own fields are well formed; budget rules are
//! enforced by the view when the submitted value reaches it.

use shared_types::{Amount, Category, NewService, ParseAmountError, Project};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: ParseAmountError,
    },
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
}

/// Edit form seeded with the current project. Untouched fields keep the
/// project's values.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    project: Project,
    name: Option<String>,
    budget: Option<String>,
    category: Option<Category>,
}

impl ProjectForm {
    pub fn new(project: &Project) -> Self {
        Self {
            project: project.clone(),
            name: None,
            budget: None,
            category: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = Some(budget.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn submit(self) -> Result<Project, FormError> {
        let mut project = self.project;

        if let Some(name) = self.name {
            project.name = name.trim().to_string();
        }
        if project.name.is_empty() {
            return Err(FormError::Missing { field: "name" });
        }

        if let Some(budget) = self.budget {
            project.budget = parse_amount("budget", &budget)?;
        }
        if self.category.is_some() {
            project.category = self.category;
        }

        Ok(project)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceForm {
    pub name: String,
    pub cost: String,
    pub description: String,
}

impl ServiceForm {
    pub fn submit(&self) -> Result<NewService, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Missing { field: "name" });
        }

        Ok(NewService {
            name: name.to_string(),
            cost: parse_amount("cost", &self.cost)?,
            description: self.description.trim().to_string(),
        })
    }
}

fn parse_amount(field: &'static str, input: &str) -> Result<Amount, FormError> {
    if input.trim().is_empty() {
        return Err(FormError::Missing { field });
    }

    let amount: Amount = input
        .parse()
        .map_err(|source| FormError::InvalidAmount { field, source })?;
    if amount.is_negative() {
        return Err(FormError::Negative { field });
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: "1".to_string(),
            name: "Website".to_string(),
            budget: Amount::from(1000),
            cost: Amount::from(400),
            ..Project::default()
        }
    }

    #[test]
    fn test_project_form_keeps_untouched_fields() {
        let edited = ProjectForm::new(&project()).budget("1500").submit().unwrap();

        assert_eq!(edited.name, "Website");
        assert_eq!(edited.budget, Amount::from(1500));
        assert_eq!(edited.cost, Amount::from(400));
        assert_eq!(edited.id, "1");
    }

    #[test]
    fn test_project_form_sets_category() {
        let category = Category {
            id: "2".to_string(),
            name: "Marketing".to_string(),
        };

        let edited = ProjectForm::new(&project())
            .name("  Landing page ")
            .category(category.clone())
            .submit()
            .unwrap();

        assert_eq!(edited.name, "Landing page");
        assert_eq!(edited.category, Some(category));
    }

    #[test]
    fn test_project_form_does_not_check_budget_against_cost() {
        let edited = ProjectForm::new(&project()).budget("100").submit().unwrap();
        assert_eq!(edited.budget, Amount::from(100));
    }

    #[test]
    fn test_project_form_errors() {
        assert_eq!(
            ProjectForm::new(&project()).name("   ").submit(),
            Err(FormError::Missing { field: "name" })
        );
        assert!(matches!(
            ProjectForm::new(&project()).budget("lots").submit(),
            Err(FormError::InvalidAmount { field: "budget", .. })
        ));
        assert_eq!(
            ProjectForm::new(&project()).budget("-5").submit(),
            Err(FormError::Negative { field: "budget" })
        );
    }

    #[test]
    fn test_service_form_submit() {
        let form = ServiceForm {
            name: "Hosting".to_string(),
            cost: "250.50".to_string(),
            description: " VPS ".to_string(),
        };

        let service = form.submit().unwrap();

        assert_eq!(service.name, "Hosting");
        assert_eq!(service.cost, Amount::new(250.5));
        assert_eq!(service.description, "VPS");
    }

    #[test]
    fn test_service_form_requires_name_and_cost() {
        let missing_name = ServiceForm {
            cost: "10".to_string(),
            ..ServiceForm::default()
        };
        let missing_cost = ServiceForm {
            name: "Hosting".to_string(),
            ..ServiceForm::default()
        };

        assert_eq!(missing_name.submit(), Err(FormError::Missing { field: "name" }));
        assert_eq!(missing_cost.submit(), Err(FormError::Missing { field: "cost" }));
    }
}
