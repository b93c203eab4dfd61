//! Plain-text rendering of the project page.

use shared_types::Service;
use std::fmt;

use crate::view::{MessageKind, StatusMessage, ViewState};

const LOADING: &str = "Carregando...";
const NO_SERVICES: &str = "Não há serviços cadastrados.";
const CLOSE: &str = "Fechar";

pub fn render(state: &ViewState) -> String {
    Page(state).to_string()
}

/// The project page for one snapshot.
pub struct Page<'a>(pub &'a ViewState);

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        // A failed load leaves its message in the state, so it is printed
        // beneath the spinner.
        if state.is_loading() {
            writeln!(f, "{LOADING}")?;
            if let Some(status) = &state.status {
                write_message(f, status)?;
            }
            return Ok(());
        }

        let project = &state.project;
        if let Some(status) = &state.status {
            write_message(f, status)?;
        }

        writeln!(f, "Projeto: {}", project.name)?;
        if state.show_project_form {
            writeln!(f, "[{CLOSE}]")?;
            writeln!(f, "  <formulário do projeto: Concluir Edição>")?;
        } else {
            writeln!(f, "[Editar projeto]")?;
            writeln!(f, "  Categoria: {}", project.category_name().unwrap_or(""))?;
            writeln!(f, "  Total do orçamento: R${}", project.budget)?;
            writeln!(f, "  Total utilizado: R${}", project.cost)?;
        }

        writeln!(f, "\nAdicione um serviço:")?;
        if state.show_service_form {
            writeln!(f, "[{CLOSE}]")?;
            writeln!(f, "  <formulário de serviço: Adicionar Serviço>")?;
        } else {
            writeln!(f, "[Adicionar Serviço]")?;
        }

        writeln!(f, "\nServiços:")?;
        if state.services.is_empty() {
            writeln!(f, "  {NO_SERVICES}")?;
        }
        for service in &state.services {
            write_service_card(f, service)?;
        }
        Ok(())
    }
}

fn write_message(f: &mut fmt::Formatter<'_>, status: &StatusMessage) -> fmt::Result {
    let tag = match status.kind {
        MessageKind::Success => "sucesso",
        MessageKind::Error => "erro",
    };
    writeln!(f, "[{tag}] {}", status.text)
}

fn write_service_card(f: &mut fmt::Formatter<'_>, service: &Service) -> fmt::Result {
    writeln!(f, "  - {} ({})", service.name, service.id)?;
    writeln!(f, "    Custo total: R${}", service.cost)?;
    if !service.description.is_empty() {
        writeln!(f, "    {}", service.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Amount, Category, Project};

    fn loaded_state() -> ViewState {
        ViewState {
            project: Project {
                id: "1".to_string(),
                name: "Website".to_string(),
                category: Some(Category {
                    id: "1".to_string(),
                    name: "Infra".to_string(),
                }),
                budget: Amount::from(1000),
                cost: Amount::from(400),
                services: Vec::new(),
            },
            ..ViewState::default()
        }
    }

    #[test]
    fn test_loading_shows_only_indicator() {
        let state = ViewState {
            status: Some(StatusMessage {
                text: "Erro ao carregar projeto".to_string(),
                kind: MessageKind::Error,
            }),
            ..ViewState::default()
        };

        let page = render(&state);

        assert!(page.starts_with(LOADING));
        assert!(page.contains("[erro] Erro ao carregar projeto"));
        assert!(!page.contains("Projeto:"));
    }

    #[test]
    fn test_page_writes_into_any_formatter() {
        let state = loaded_state();

        let page = format!("{}\n", Page(&state));

        assert_eq!(page.trim_end(), render(&state).trim_end());
        assert!(page.ends_with(&format!("  {NO_SERVICES}\n\n")));
    }

    #[test]
    fn test_details_block() {
        let page = render(&loaded_state());

        assert!(page.contains("Projeto: Website"));
        assert!(page.contains("[Editar projeto]"));
        assert!(page.contains("Categoria: Infra"));
        assert!(page.contains("Total do orçamento: R$1000"));
        assert!(page.contains("Total utilizado: R$400"));
        assert!(page.contains(NO_SERVICES));
    }

    #[test]
    fn test_open_forms_replace_buttons() {
        let state = ViewState {
            show_project_form: true,
            show_service_form: true,
            ..loaded_state()
        };

        let page = render(&state);

        assert!(page.contains("Concluir Edição"));
        assert!(!page.contains("Total do orçamento"));
        assert_eq!(page.matches("[Fechar]").count(), 2);
    }

    #[test]
    fn test_service_cards_follow_services_snapshot() {
        let state = ViewState {
            services: vec![Service {
                id: "s1".to_string(),
                name: "Hosting".to_string(),
                cost: Amount::new(199.9),
                description: "VPS".to_string(),
            }],
            status: Some(StatusMessage {
                text: "Serviço adicionado!".to_string(),
                kind: MessageKind::Success,
            }),
            ..loaded_state()
        };

        let page = render(&state);

        assert!(page.starts_with("[sucesso] Serviço adicionado!"));
        assert!(page.contains("- Hosting (s1)"));
        assert!(page.contains("Custo total: R$199.9"));
        assert!(!page.contains(NO_SERVICES));
    }
}
